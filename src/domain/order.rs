// ==========================================
// 订单报表核心 - 订单记录模型
// ==========================================
// 职责: 字段集合 / 校验规则 / 规范文本渲染
// 红线: 记录一经构造不可变；构造要么五个字段全部合法，要么整体失败
// ==========================================

use crate::domain::types::OrderField;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// 订单记录校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("字段数量错误: 期望 {expected}，实际 {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("字段缺失: {0}")]
    MissingField(OrderField),

    #[error("字段格式错误 ({field}): {value:?}")]
    InvalidField { field: OrderField, value: String },
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;

// ==========================================
// 校验正则（编译一次）
// ==========================================
// 字符集: ASCII 字母数字 + 源数据区域的扩展字母
static CLIENT_ID_PATTERN: OnceLock<Regex> = OnceLock::new();
static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
static DIGITS_PATTERN: OnceLock<Regex> = OnceLock::new();
static PRICE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn client_id_regex() -> &'static Regex {
    CLIENT_ID_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9ĄąĆćĘęŁłŃńÓóŚśŹźŻż]{1,6}$").expect("Invalid clientId regex pattern")
    })
}

fn name_regex() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9ĄąĆćĘęŁłŃńÓóŚśŹźŻż ]{1,255}$").expect("Invalid name regex pattern")
    })
}

fn digits_regex() -> &'static Regex {
    DIGITS_PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("Invalid digits regex pattern"))
}

fn price_regex() -> &'static Regex {
    PRICE_PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{1,10}\.[0-9]{2}$").expect("Invalid price regex pattern"))
}

// ==========================================
// Order - 订单记录
// ==========================================
// 相等性: 五个字段值全部相等（值语义）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    client_id: String,
    request_id: i64,
    name: String,
    quantity: i32,
    price: Decimal,
}

impl Order {
    /// 从原始文本字段构造订单
    ///
    /// # 参数
    /// - fields: 原始字段（规范顺序: clientId, requestId, name, quantity, price）
    ///
    /// # 返回
    /// - Ok(Order): 五个字段全部合法
    /// - Err(ValidationError): 字段数量错误 / 字段缺失 / 字段格式错误
    ///
    /// # 校验顺序
    /// 1. 字段数量必须为 5
    /// 2. 任一字段为空 → 缺失
    /// 3. 按字段顺序逐一校验规则
    pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> ValidationResult<Order> {
        if fields.len() != OrderField::COUNT {
            return Err(ValidationError::FieldCount {
                expected: OrderField::COUNT,
                actual: fields.len(),
            });
        }

        let raw = |field: OrderField| fields[field.index()].as_ref();

        if let Some(missing) = OrderField::ALL.into_iter().find(|f| raw(*f).is_empty()) {
            return Err(ValidationError::MissingField(missing));
        }

        let client_id = parse_client_id(raw(OrderField::ClientId))?;
        let request_id = parse_integer::<i64>(OrderField::RequestId, raw(OrderField::RequestId))?;
        let name = parse_name(raw(OrderField::Name))?;
        let quantity = parse_integer::<i32>(OrderField::Quantity, raw(OrderField::Quantity))?;
        let price = parse_price(raw(OrderField::Price))?;

        Ok(Order {
            client_id,
            request_id,
            name,
            quantity,
            price,
        })
    }

    /// 从类型化字段构造订单
    ///
    /// 先按规范格式渲染为文本，再走与 `parse_fields` 完全相同的校验，
    /// 保证两个构造入口接受/拒绝的输入一致。
    pub fn from_fields(
        client_id: &str,
        request_id: i64,
        name: &str,
        quantity: i32,
        price: Decimal,
    ) -> ValidationResult<Order> {
        let rendered = [
            client_id.to_string(),
            request_id.to_string(),
            name.to_string(),
            quantity.to_string(),
            price.to_string(),
        ];
        Self::parse_fields(&rendered)
    }

    /// 从仓储读回已校验过的数据（不再重复校验）
    ///
    /// price_cents: 以分为单位的价格
    pub(crate) fn from_trusted(
        client_id: String,
        request_id: i64,
        name: String,
        quantity: i32,
        price_cents: i64,
    ) -> Order {
        Order {
            client_id,
            request_id,
            name,
            quantity,
            price: Decimal::new(price_cents, 2),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// 以分为单位的价格（scale 固定为 2，mantissa 最多 12 位）
    pub fn price_cents(&self) -> i64 {
        self.price.mantissa() as i64
    }

    /// 规范渲染: clientId,requestId,name,quantity,price
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.client_id, self.request_id, self.name, self.quantity, self.price
        )
    }
}

// ==========================================
// 字段规则
// ==========================================

fn invalid(field: OrderField, value: &str) -> ValidationError {
    ValidationError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// clientId: 1-6 位字母数字，不含空格
fn parse_client_id(value: &str) -> ValidationResult<String> {
    if client_id_regex().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(invalid(OrderField::ClientId, value))
    }
}

/// name: 去除首尾空白后 1-255 位字母数字或空格，保存原始值
fn parse_name(value: &str) -> ValidationResult<String> {
    let trimmed = value.trim_matches(|c: char| c <= ' ');
    if name_regex().is_match(trimmed) {
        Ok(value.to_string())
    } else {
        Err(invalid(OrderField::Name, value))
    }
}

/// 整数字段两步校验: 全数字 + 目标位宽内无溢出
fn parse_integer<T: FromStr>(field: OrderField, value: &str) -> ValidationResult<T> {
    if !digits_regex().is_match(value) {
        return Err(invalid(field, value));
    }
    value.parse::<T>().map_err(|_| invalid(field, value))
}

/// 去除价格前导零；若第一个非零字符是小数点，则保留一个零
fn strip_leading_zeros(value: &str) -> &str {
    match value.find(|c: char| c != '0') {
        Some(idx) if idx > 0 && value.as_bytes()[idx] == b'.' => &value[idx - 1..],
        Some(idx) => &value[idx..],
        None => value,
    }
}

/// price: 去前导零后匹配 digits{1,10}.digits{2}
fn parse_price(value: &str) -> ValidationResult<Decimal> {
    let normalized = strip_leading_zeros(value);
    if !price_regex().is_match(normalized) {
        return Err(invalid(OrderField::Price, value));
    }
    Decimal::from_str(normalized).map_err(|_| invalid(OrderField::Price, value))
}
