//! 命令参数校验模式

use infrastructure_common::{ValidationResult, ValidationResultType};
use serde_json::Value;

/// 必填值缺失
pub const VALUE_IS_NULL: &str = "VALUE_IS_NULL";
/// 类型不匹配
pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
/// 值不是对象
pub const IS_NOT_OBJECT: &str = "IS_NOT_OBJECT";
/// 未声明的属性
pub const UNEXPECTED_PROPERTY: &str = "UNEXPECTED_PROPERTY";

/// 值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// 字符串
    String,
    /// 32 位整数
    Integer,
    /// 64 位整数
    Long,
    /// 单精度浮点
    Float,
    /// 双精度浮点
    Double,
    /// 布尔值
    Boolean,
    /// 数组
    Array,
    /// 键值映射
    Map,
    /// 对象
    Object,
    /// 任意类型
    Any,
}

impl TypeCode {
    /// 判断 JSON 值是否符合类型
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value
                .as_i64()
                .map_or(false, |number| i32::try_from(number).is_ok()),
            Self::Long => value.as_i64().is_some(),
            Self::Float | Self::Double => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Map | Self::Object => value.is_object(),
            Self::Any => true,
        }
    }

    /// 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Map => "map",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    /// JSON 值的类型名称
    pub fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(number) if number.is_f64() => "double",
            Value::Number(_) => "long",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// 属性模式
#[derive(Debug, Clone)]
pub struct PropertySchema {
    /// 属性名称
    pub name: String,
    /// 期望类型，`None` 表示不检查
    pub type_code: Option<TypeCode>,
    /// 是否必填
    pub required: bool,
    /// 嵌套对象模式
    pub schema: Option<Box<ObjectSchema>>,
}

impl PropertySchema {
    /// 创建属性模式
    pub fn new(name: impl Into<String>, type_code: Option<TypeCode>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_code,
            required,
            schema: None,
        }
    }

    /// 设置嵌套对象模式
    pub fn with_schema(mut self, schema: ObjectSchema) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    fn validate(&self, path: &str, value: Option<&Value>, results: &mut Vec<ValidationResult>) {
        let value = match value {
            Some(Value::Null) | None => {
                if self.required {
                    results.push(ValidationResult::error(
                        path,
                        VALUE_IS_NULL,
                        format!("缺少必填属性 {}", self.name),
                    ));
                }
                return;
            }
            Some(value) => value,
        };

        if let Some(type_code) = self.type_code {
            if !type_code.matches(value) {
                results.push(
                    ValidationResult::error(
                        path,
                        TYPE_MISMATCH,
                        format!("属性 {} 期望类型: {}", self.name, type_code.name()),
                    )
                    .with_values(type_code.name(), TypeCode::name_of(value)),
                );
                return;
            }
        }

        if let Some(schema) = &self.schema {
            schema.validate_at(path, value, results);
        }
    }
}

/// 对象模式
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    properties: Vec<PropertySchema>,
    allow_undefined: bool,
    required: bool,
}

impl ObjectSchema {
    /// 创建空的对象模式
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必填属性
    pub fn with_required_property(mut self, name: impl Into<String>, type_code: TypeCode) -> Self {
        self.properties
            .push(PropertySchema::new(name, Some(type_code), true));
        self
    }

    /// 添加可选属性
    pub fn with_optional_property(mut self, name: impl Into<String>, type_code: TypeCode) -> Self {
        self.properties
            .push(PropertySchema::new(name, Some(type_code), false));
        self
    }

    /// 添加属性模式
    pub fn with_property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    /// 是否允许未声明的属性
    pub fn allow_undefined(mut self, allow: bool) -> Self {
        self.allow_undefined = allow;
        self
    }

    /// 对象本身是否必填
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// 已声明的属性
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    /// 校验值，返回全部校验结果
    ///
    /// 对象模式下的 `null` 按空对象处理，必填属性仍会被报告。
    pub fn validate(&self, value: &Value) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        self.validate_at("", value, &mut results);
        results
    }

    fn validate_at(&self, path: &str, value: &Value, results: &mut Vec<ValidationResult>) {
        let empty = serde_json::Map::new();
        let object = match value {
            Value::Object(object) => object,
            Value::Null => {
                if self.required {
                    results.push(ValidationResult::error(path, VALUE_IS_NULL, "缺少必填值"));
                    return;
                }
                &empty
            }
            other => {
                results.push(
                    ValidationResult::error(path, IS_NOT_OBJECT, "值必须是对象")
                        .with_values("object", TypeCode::name_of(other)),
                );
                return;
            }
        };

        for property in &self.properties {
            let property_path = join_path(path, &property.name);
            property.validate(&property_path, object.get(&property.name), results);
        }

        if !self.allow_undefined {
            for key in object.keys() {
                if !self.properties.iter().any(|property| &property.name == key) {
                    results.push(ValidationResult::new(
                        join_path(path, key),
                        ValidationResultType::Warning,
                        UNEXPECTED_PROPERTY,
                        format!("未声明的属性 {key}"),
                    ));
                }
            }
        }
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
