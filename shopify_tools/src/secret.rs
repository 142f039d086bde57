use std::{
    fmt,
    fmt::{Debug, Display},
};

/// Wraps a credential so that it never leaks into logs. `Debug` and `Display` both print `****`; use
/// [`Secret::reveal`] at the single point where the value is actually needed.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl Secret<String> {
    /// True if no credential was supplied, or it is blank.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl<T: Clone + Default> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let secret = Secret::new("shpat_0123456789".to_string());
        assert_eq!(format!("{secret}"), "****");
        assert_eq!(format!("{secret:?}"), "****");
        assert_eq!(secret.reveal(), "shpat_0123456789");
    }

    #[test]
    fn blank_secrets_are_empty() {
        assert!(Secret::<String>::default().is_empty());
        assert!(Secret::from("  ".to_string()).is_empty());
        assert!(!Secret::from("x".to_string()).is_empty());
    }
}
