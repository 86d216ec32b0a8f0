//! 命令
//!
//! 命名、带参数校验的可调用操作，以及命令集、拦截器和函数命令。

pub mod command;
pub mod command_set;
pub mod interceptor;
pub mod schema;

pub use command::*;
pub use command_set::*;
pub use interceptor::*;
pub use schema::*;
