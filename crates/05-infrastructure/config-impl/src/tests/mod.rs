//! 配置读取测试
