use std::str::FromStr;

use anyhow::Context;

/// Named configuration variables, empty values count as unset
pub struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    /// Read and parse a variable.
    ///
    /// Unset variables yield `Ok(None)`, values that fail to parse are an error.
    pub fn parsed<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid value for {key}: {value:?}"))
            })
            .transpose()
    }
}

/// Variables of the process environment
pub fn env_vars() -> Vars<impl Fn(&str) -> Option<String>> {
    Vars::new(|key: &str| std::env::var(key).ok())
}

/// Round a percentage to one decimal place
pub fn round_percent(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `used` in `total`, `None` when the total is zero
pub fn percent_of(used: u64, total: u64) -> Option<f32> {
    if total == 0 {
        return None;
    }
    Some(round_percent((used as f64 / total as f64 * 100.0) as f32))
}
