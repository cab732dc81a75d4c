use serde::{Deserialize, Deserializer};

// query strings carry the page as text; anything that is not an integer means page 1
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(first_page))
}

pub fn first_page() -> i64 {
    1
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawInt {
    Number(i64),
    Text(String),
}

// clients send ids and difficulties either as numbers or as numeric strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawInt")]
pub struct FlexibleInt(pub i64);

impl TryFrom<RawInt> for FlexibleInt {
    type Error = String;

    fn try_from(value: RawInt) -> Result<Self, Self::Error> {
        match value {
            RawInt::Number(v) => Ok(FlexibleInt(v)),
            RawInt::Text(text) => match text.trim().parse::<i64>() {
                Ok(v) => Ok(FlexibleInt(v)),
                Err(_) => Err(format!("Wrong value {text}, can not parse to i64")),
            },
        }
    }
}
