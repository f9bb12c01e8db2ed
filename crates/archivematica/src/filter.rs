//! Django-style query filters for Storage Service list endpoints.

use std::fmt;

use url::form_urlencoded;

/// A filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Integer(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// Field lookups appended to the field name as `__<lookup>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    LessThan,
    GreaterThan,
    StartsWith,
}

impl Adjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Adjustment::LessThan => "lt",
            Adjustment::GreaterThan => "gt",
            Adjustment::StartsWith => "startswith",
        }
    }
}

/// One `field[__lookup]=value` filter.
///
/// ```
/// use archivematica::DjangoFilter;
///
/// let filter = DjangoFilter::new("description", "Main pipeline").starts_with();
/// assert_eq!(filter.field(), "description__startswith");
/// assert_eq!(filter.value(), "Main pipeline");
/// assert_eq!(filter.build(), "description__startswith=Main+pipeline");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DjangoFilter {
    field: String,
    value: FilterValue,
    adjustment: Option<Adjustment>,
}

impl DjangoFilter {
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            adjustment: None,
        }
    }

    pub fn less_than(mut self) -> Self {
        self.adjustment = Some(Adjustment::LessThan);
        self
    }

    pub fn greater_than(mut self) -> Self {
        self.adjustment = Some(Adjustment::GreaterThan);
        self
    }

    pub fn starts_with(mut self) -> Self {
        self.adjustment = Some(Adjustment::StartsWith);
        self
    }

    pub fn clear_adjustment(mut self) -> Self {
        self.adjustment = None;
        self
    }

    pub fn adjustment(&self) -> Option<Adjustment> {
        self.adjustment
    }

    /// The field name including any lookup suffix.
    pub fn field(&self) -> String {
        match self.adjustment {
            Some(adjustment) => format!("{}__{}", self.field, adjustment.as_str()),
            None => self.field.clone(),
        }
    }

    /// The value as sent, before URL encoding.
    pub fn value(&self) -> String {
        self.value.to_string()
    }

    /// The filter as a `(name, value)` query pair.
    pub fn query_pair(&self) -> (String, String) {
        (self.field(), self.value())
    }

    /// Render as `field=value` with the value URL encoded.
    pub fn build(&self) -> String {
        let value = self.value();
        let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
        format!("{}={}", self.field(), encoded)
    }
}

impl fmt::Display for DjangoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_value_kind() {
        assert_eq!(DjangoFilter::new("some-field", "some-value").build(), "some-field=some-value");
        assert_eq!(DjangoFilter::new("some-field", 5).build(), "some-field=5");
        assert_eq!(DjangoFilter::new("some-field", 5.5).build(), "some-field=5.5");
        assert_eq!(DjangoFilter::new("some-field", true).build(), "some-field=true");
        assert_eq!(DjangoFilter::new("some-field", false).build(), "some-field=false");
    }

    #[test]
    fn adjustments_suffix_the_field() {
        let filter = DjangoFilter::new("some-field", "data");
        assert_eq!(filter.field(), "some-field");
        assert_eq!(filter.clone().less_than().field(), "some-field__lt");
        assert_eq!(filter.clone().greater_than().field(), "some-field__gt");
        assert_eq!(filter.starts_with().field(), "some-field__startswith");
    }

    #[test]
    fn last_adjustment_wins() {
        let filter = DjangoFilter::new("some-field", 5.5)
            .starts_with()
            .less_than()
            .greater_than();
        assert_eq!(filter.build(), "some-field__gt=5.5");
        assert_eq!(filter.clear_adjustment().build(), "some-field=5.5");
    }

    #[test]
    fn value_is_not_encoded_but_build_is() {
        let filter = DjangoFilter::new("some-field", "value : with");
        assert_eq!(filter.value(), "value : with");
        assert_eq!(filter.build(), "some-field=value+%3A+with");
    }

    #[test]
    fn numbers_render_as_strings() {
        assert_eq!(DjangoFilter::new("f", 123).value(), "123");
        assert_eq!(DjangoFilter::new("f", 987.654).value(), "987.654");
    }
}
