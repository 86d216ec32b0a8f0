//! 配置模板参数替换

use infrastructure_common::{ConfigError, ConfigParams};
use once_cell::sync::OnceCell;
use regex::{Captures, Regex};

static PLACEHOLDER: OnceCell<Regex> = OnceCell::new();

/// 替换文本中的 `{{ name }}` 占位符
///
/// 未提供的参数替换为空字符串。
pub fn parameterize(template: &str, parameters: &ConfigParams) -> Result<String, ConfigError> {
    let regex = PLACEHOLDER
        .get_or_try_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}"))
        .map_err(|e| ConfigError::ParseError {
            path: "<template>".to_string(),
            source: Box::new(e),
        })?;

    let rendered = regex.replace_all(template, |captures: &Captures<'_>| {
        parameters.get(&captures[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}
