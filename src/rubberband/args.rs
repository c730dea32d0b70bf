//! Ordered `--option value` lists for the rubberband command line.

use std::ffi::{OsStr, OsString};

/// Options passed to the stretch tool, in insertion order.
///
/// An option with an empty value is passed as a bare flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RubberbandArgs {
    options: Vec<(String, OsString)>,
}

impl RubberbandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, flag: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        self.set(flag, value);
        self
    }

    /// Set `flag`, replacing any existing value.
    pub fn set(&mut self, flag: impl Into<String>, value: impl AsRef<OsStr>) -> &mut Self {
        let flag = flag.into();
        let value = value.as_ref().to_os_string();
        match self.options.iter_mut().find(|(f, _)| *f == flag) {
            Some(slot) => slot.1 = value,
            None => self.options.push((flag, value)),
        }
        self
    }

    /// Set `flag` only if it is not already present. Returns whether it was set.
    pub fn set_default(&mut self, flag: impl Into<String>, value: impl AsRef<OsStr>) -> bool {
        let flag = flag.into();
        if self.contains(&flag) {
            return false;
        }
        self.options.push((flag, value.as_ref().to_os_string()));
        true
    }

    pub fn get(&self, flag: &str) -> Option<&OsStr> {
        self.options
            .iter()
            .find(|(f, _)| f == flag)
            .map(|(_, v)| v.as_os_str())
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.options.iter().any(|(f, _)| f == flag)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.options.iter().map(|(f, v)| (f.as_str(), v.as_os_str()))
    }

    /// Flatten into command-line words.
    pub fn to_command_args(&self) -> Vec<OsString> {
        let mut out = Vec::with_capacity(self.options.len() * 2);
        for (flag, value) in &self.options {
            out.push(OsString::from(flag));
            if !value.is_empty() {
                out.push(value.clone());
            }
        }
        out
    }
}

impl<K: Into<String>, V: AsRef<OsStr>> FromIterator<(K, V)> for RubberbandArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (flag, value) in iter {
            args.set(flag, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut args = RubberbandArgs::new().with("--tempo", "2").with("--pitch", "1");
        args.set("--tempo", "3");
        assert_eq!(args.to_command_args(), vec!["--tempo", "3", "--pitch", "1"]);
    }

    #[test]
    fn set_default_keeps_caller_value() {
        let mut args = RubberbandArgs::new().with("--time", "0.5");
        assert!(!args.set_default("--time", "2"));
        assert!(args.set_default("--timemap", "/tmp/map.txt"));
        assert_eq!(args.get("--time"), Some(OsStr::new("0.5")));
        assert_eq!(args.get("--timemap"), Some(OsStr::new("/tmp/map.txt")));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn empty_value_is_bare_flag() {
        let args: RubberbandArgs = [("--formant", ""), ("--crisp", "6")].into_iter().collect();
        assert_eq!(args.to_command_args(), vec!["--formant", "--crisp", "6"]);
    }

    #[test]
    fn iter_preserves_order() {
        let args = RubberbandArgs::new().with("-a", "1").with("-b", "2");
        let flags: Vec<&str> = args.iter().map(|(f, _)| f).collect();
        assert_eq!(flags, vec!["-a", "-b"]);
        assert!(!args.is_empty());
        assert!(!args.contains("-c"));
    }
}
