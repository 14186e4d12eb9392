//! 运行时状态模块
//!
//! 管理应用状态和动作互斥

pub mod app_state;

pub use app_state::{AppState, RunningAction};
