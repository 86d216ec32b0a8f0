//! 组件生命周期状态

use serde::{Deserialize, Serialize};
use std::fmt;

/// 容器生命周期状态
///
/// 状态机：`Closed -> Opening -> Open -> Closing -> Closed`，
/// 打开过程中失败会短暂进入 `Failed`，回滚完成后回到 `Closed`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    /// 已关闭
    #[default]
    Closed,
    /// 打开中
    Opening,
    /// 已打开
    Open,
    /// 关闭中
    Closing,
    /// 打开失败，正在回滚
    Failed,
}

impl LifecycleState {
    /// 是否可以打开
    pub fn can_open(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// 是否可以关闭
    pub fn can_close(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
