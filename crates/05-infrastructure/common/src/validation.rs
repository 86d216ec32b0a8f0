//! 数据校验结果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 校验结果级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResultType {
    /// 提示
    Information,
    /// 警告
    Warning,
    /// 错误
    Error,
}

/// 单条校验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 字段路径，根对象为空字符串
    pub path: String,
    /// 级别
    pub result_type: ValidationResultType,
    /// 错误码
    pub code: String,
    /// 描述
    pub message: String,
    /// 期望值（如类型名）
    pub expected: Option<String>,
    /// 实际值
    pub actual: Option<String>,
}

impl ValidationResult {
    /// 创建新的校验结果
    pub fn new(
        path: impl Into<String>,
        result_type: ValidationResultType,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            result_type,
            code: code.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// 创建错误级别的结果
    pub fn error(path: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, ValidationResultType::Error, code, message)
    }

    /// 创建警告级别的结果
    pub fn warning(
        path: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(path, ValidationResultType::Warning, code, message)
    }

    /// 设置期望值与实际值
    pub fn with_values(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// 是否为错误级别
    pub fn is_error(&self) -> bool {
        self.result_type == ValidationResultType::Error
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.code, self.path, self.message)
        }
    }
}

/// 从结果集中筛选出需要中断调用的结果
///
/// 非严格模式只保留错误，严格模式同时保留警告。
pub fn blocking_results(results: &[ValidationResult], strict: bool) -> Vec<ValidationResult> {
    results
        .iter()
        .filter(|result| match result.result_type {
            ValidationResultType::Error => true,
            ValidationResultType::Warning => strict,
            ValidationResultType::Information => false,
        })
        .cloned()
        .collect()
}
