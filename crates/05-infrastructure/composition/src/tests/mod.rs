//! 组合层测试
