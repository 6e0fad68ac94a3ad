pub mod indicator;
pub mod result;
pub mod stats;
pub mod task;

pub use indicator::{Indicator, IndicatorCategory};
pub use result::{max_score, min_score, EvaluationResult, RadarChartData, RadarSeries, ResultItem};
pub use stats::{CpuStats, DiskStats, MemoryStats, SystemStats};
pub use task::{
    AgentConfig, AgentConfigUpdate, DatasetConfig, Task, TaskCreate, TaskDetail, TaskStatus,
    TaskUpdate,
};
