//! 版本号校验与升级策略
//!
//! 版本号格式为 `v<major>.<minor>.<patch>`，各分量为任意长度的十进制数字。
//! 分量按十进制字符串递增，因此不存在溢出。

use crate::storage::registry::RegistryError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("version pattern is valid")
});

/// 判断字符串是否为合法版本号
pub fn validate_version(s: &str) -> bool {
    VERSION_PATTERN.is_match(s)
}

/// 升级类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpKind {
    /// 补丁版本 +1
    #[default]
    Patch,
    /// 次版本 +1，补丁归零
    Minor,
    /// 主版本 +1，其余归零
    Major,
}

impl BumpKind {
    /// 对版本号执行本次升级
    pub fn apply(self, version: &str) -> Result<String, RegistryError> {
        match self {
            BumpKind::Patch => bump_patch(version),
            BumpKind::Minor => bump_minor(version),
            BumpKind::Major => bump_major(version),
        }
    }
}

impl FromStr for BumpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patch" => Ok(BumpKind::Patch),
            "minor" => Ok(BumpKind::Minor),
            "major" => Ok(BumpKind::Major),
            other => Err(format!(
                "unknown bump kind '{}', expected patch, minor or major",
                other
            )),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        };
        f.write_str(name)
    }
}

/// 补丁版本 +1：`v1.0.9` -> `v1.0.10`
pub fn bump_patch(version: &str) -> Result<String, RegistryError> {
    let (major, minor, patch) = split(version)?;
    Ok(format!(
        "v{}.{}.{}",
        normalize(major),
        normalize(minor),
        increment(patch)
    ))
}

/// 次版本 +1，补丁归零：`v2.9.3` -> `v2.10.0`
pub fn bump_minor(version: &str) -> Result<String, RegistryError> {
    let (major, minor, _) = split(version)?;
    Ok(format!("v{}.{}.0", normalize(major), increment(minor)))
}

/// 主版本 +1，其余归零：`v9.9.9` -> `v10.0.0`
pub fn bump_major(version: &str) -> Result<String, RegistryError> {
    let (major, _, _) = split(version)?;
    Ok(format!("v{}.0.0", increment(major)))
}

fn split(version: &str) -> Result<(&str, &str, &str), RegistryError> {
    let caps = VERSION_PATTERN
        .captures(version)
        .ok_or_else(|| RegistryError::InvalidVersion(version.to_string()))?;
    match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(major), Some(minor), Some(patch)) => {
            Ok((major.as_str(), minor.as_str(), patch.as_str()))
        }
        _ => Err(RegistryError::InvalidVersion(version.to_string())),
    }
}

/// 去掉前导零，全零时保留一个 `0`
fn normalize(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// 十进制字符串 +1
fn increment(digits: &str) -> String {
    let mut out: Vec<u8> = normalize(digits).bytes().collect();
    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, b'1');
            break;
        }
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            break;
        }
    }
    // 输入只包含 ASCII 数字
    String::from_utf8(out).unwrap_or_default()
}
