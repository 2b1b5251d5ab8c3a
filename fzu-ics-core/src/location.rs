use serde::{Deserialize, Serialize};

/// 默认去掉的校区前缀
pub const DEFAULT_CAMPUS_PREFIXES: &[&str] = &["旗山"];

/// 地点名称处理：去掉校区前缀和多余空白
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationNormalizer {
    prefixes: Vec<String>,
}

impl LocationNormalizer {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// 只去掉第一个匹配的前缀，其余内容原样保留
    pub fn strip_prefix<'a>(&self, original: &'a str) -> &'a str {
        self.prefixes
            .iter()
            .find_map(|prefix| original.strip_prefix(prefix.as_str()))
            .unwrap_or(original)
    }

    /// 去掉前缀并整理空白，用于显示
    pub fn normalize(&self, original: &str) -> String {
        self.strip_prefix(original.trim())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAMPUS_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_campus_prefix() {
        let normalizer = LocationNormalizer::default();
        assert_eq!(normalizer.normalize("旗山西三-204"), "西三-204");
        assert_eq!(normalizer.normalize("铜盘A201"), "铜盘A201");
    }

    #[test]
    fn test_strip_prefix_keeps_raw_text() {
        let normalizer = LocationNormalizer::default();
        assert_eq!(normalizer.strip_prefix("旗山东3  101"), "东3  101");
        assert_eq!(normalizer.strip_prefix(" 旗山东3"), " 旗山东3");
    }

    #[test]
    fn test_whitespace_cleanup() {
        let normalizer = LocationNormalizer::default();
        assert_eq!(normalizer.normalize("  旗山东3  101 "), "东3 101");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_custom_prefixes() {
        let normalizer = LocationNormalizer::new(vec!["铜盘".to_string(), "旗山".to_string()]);
        assert_eq!(normalizer.normalize("铜盘A201"), "A201");
        assert_eq!(normalizer.normalize("旗山旗山楼"), "旗山楼");
    }
}
