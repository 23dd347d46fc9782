//! Case builder: structured test cases from unstructured document text.
//!
//! The source document is a free-form evaluation write-up; its plain text is
//! split on `Case #N` headings, and each candidate section is run through a
//! bank of field matchers. Every field is a sequence of independent,
//! order-tried patterns returning an optional value; the first success wins.
//! Sections missing a query or category are expected noise and dropped
//! silently.

use std::collections::BTreeMap;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use super::parser::{CaseFile, HardConstraints, SoftReference, TestCase};

lazy_static! {
    /// Case headings: "Case 3", "Case #12".
    static ref CASE_HEADING: Regex = Regex::new(r"(?i)Case\s+#?(\d+)").unwrap();

    // =========================================================================
    // FIELD MATCHERS (first successful pattern wins)
    // =========================================================================

    static ref CATEGORY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"类别[：:]\s*([^\n]+)").unwrap(),
        Regex::new(r"(?i)Category[：:]\s*([^\n]+)").unwrap(),
        Regex::new(r"分类[：:]\s*([^\n]+)").unwrap(),
    ];

    static ref QUERY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"查询[：:]\s*["“”]([^"“”]+)["“”]"#).unwrap(),
        Regex::new(r#"(?i)Query[：:]\s*["“”]([^"“”]+)["“”]"#).unwrap(),
        Regex::new(r#"用户输入[：:]\s*["“”]([^"“”]+)["“”]"#).unwrap(),
        Regex::new(r#"问题[：:]\s*["“”]([^"“”]+)["“”]"#).unwrap(),
        // Fallback: the first long quoted span.
        Regex::new(r#"["“”]([^"“”]{20,}?)["“”]"#).unwrap(),
    ];

    static ref WEIGHT_PATTERN: Regex = Regex::new(r"体重[：:]\s*([^\n,，]+)").unwrap();
    static ref FOOT_TYPE_PATTERN: Regex =
        Regex::new(r"(扁平足|高足弓|宽脚|内旋|外翻)").unwrap();
    static ref PACE_PATTERN: Regex = Regex::new(r"配速[：:]\s*([^\n,，]+)").unwrap();
    static ref PAIN_PATTERN: Regex =
        Regex::new(r"(膝盖疼|足弓酸痛|脚踝不适|挤脚|磨泡)").unwrap();

    // Block labels are anchored to line starts so a label word occurring
    // inside prose (a query mentioning 推荐) cannot open a block.
    static ref MUST_HAVE_PATTERN: Regex =
        Regex::new(r"(?is)must[_-]have[：:](.+?)(?:\n\s*must[_-]not|\z)").unwrap();
    static ref MUST_NOT_PATTERN: Regex =
        Regex::new(r"(?is)must[_-]not[：:](.+?)(?:\n\s*(?:推荐|suggested|soft)|\z)").unwrap();

    static ref SUGGESTED_PATTERN: Regex =
        Regex::new(r"(?is)(?:^|\n)\s*(?:推荐|suggested[_-]shoes)[：:](.+?)(?:\n\s*(?:备选|alternatives)[：:]|\z)")
            .unwrap();
    static ref ALTERNATIVES_PATTERN: Regex =
        Regex::new(r"(?is)(?:^|\n)\s*(?:备选|alternatives)[：:](.+?)(?:\n\s*confidence|\z)").unwrap();

    static ref LIST_SEPARATOR: Regex = Regex::new(r"[,，\n]").unwrap();
}

/// At most this many entries are kept per constraint/reference list.
const MAX_LIST_ENTRIES: usize = 3;

/// Category inference keywords, tried when no labeled category is present.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("大体重", "大体重缓震"),
    ("体重", "大体重缓震"),
    ("扁平足", "足型-扁平足"),
    ("宽脚", "足型-宽脚"),
    ("宽楦", "足型-宽脚"),
    ("碳板", "慢速体验碳板"),
    ("越野", "越野-泥地防滑"),
    ("速度训练", "速度训练-平价无碳板"),
    ("间歇跑", "速度训练-平价无碳板"),
];

/// Extract a complete case file from document text.
///
/// Cases are sorted ascending by id; a later section reusing an id already
/// seen is treated as extraction noise and dropped.
pub fn extract_cases(text: &str, description: impl Into<String>) -> CaseFile {
    let mut cases: Vec<TestCase> = Vec::new();

    for (id, section) in case_sections(text) {
        let Some(case) = build_case(id, section) else {
            tracing::debug!(id, "dropping malformed case section");
            continue;
        };
        if cases.iter().any(|c| c.id == id) {
            tracing::debug!(id, "dropping duplicate case id");
            continue;
        }
        cases.push(case);
    }

    cases.sort_by_key(|c| c.id);
    tracing::info!(count = cases.len(), "extracted cases");

    CaseFile {
        version: "2.0".to_string(),
        description: description.into(),
        extracted_at: Utc::now(),
        cases,
    }
}

/// Split the text into (case id, section body) pairs. Each section runs from
/// the end of its heading to the start of the next.
fn case_sections(text: &str) -> Vec<(u32, &str)> {
    let headings: Vec<(Option<u32>, usize, usize)> = CASE_HEADING
        .captures_iter(text)
        .map(|caps| {
            let heading = caps.get(0).expect("group 0 always present");
            (caps[1].parse().ok(), heading.start(), heading.end())
        })
        .collect();

    headings
        .iter()
        .enumerate()
        .filter_map(|(i, &(id, _, body_start))| {
            let body_end = headings
                .get(i + 1)
                .map(|&(_, next_start, _)| next_start)
                .unwrap_or(text.len());
            Some((id?, &text[body_start..body_end]))
        })
        .collect()
}

/// Assemble one case; `None` when a required field is missing.
fn build_case(id: u32, section: &str) -> Option<TestCase> {
    if id == 0 {
        return None;
    }
    let query = extract_query(section)?;
    let category = extract_category(section);

    Some(TestCase {
        id,
        category,
        query,
        profile: extract_profile(section),
        hard_constraints: extract_constraints(section),
        soft_reference: extract_reference(section),
    })
}

fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn extract_category(section: &str) -> String {
    if let Some(category) = first_capture(section, &CATEGORY_PATTERNS) {
        return category;
    }

    for (keyword, category) in CATEGORY_KEYWORDS {
        if section.contains(keyword) {
            return category.to_string();
        }
    }

    "未分类".to_string()
}

fn extract_query(section: &str) -> Option<String> {
    first_capture(section, &QUERY_PATTERNS)
}

fn extract_profile(section: &str) -> Option<BTreeMap<String, String>> {
    let mut profile = BTreeMap::new();

    let fields: [(&str, &Regex); 4] = [
        ("weight", &WEIGHT_PATTERN),
        ("foot_type", &FOOT_TYPE_PATTERN),
        ("pace", &PACE_PATTERN),
        ("pain_point", &PAIN_PATTERN),
    ];

    for (key, pattern) in fields {
        if let Some(value) = pattern
            .captures(section)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
        {
            profile.insert(key.to_string(), value);
        }
    }

    (!profile.is_empty()).then_some(profile)
}

fn extract_constraints(section: &str) -> HardConstraints {
    HardConstraints {
        must_have: capture_list(section, &MUST_HAVE_PATTERN, |_| true),
        must_not: capture_list(section, &MUST_NOT_PATTERN, |_| true),
    }
}

fn extract_reference(section: &str) -> SoftReference {
    SoftReference {
        suggested_shoes: capture_list(section, &SUGGESTED_PATTERN, looks_like_item_name),
        alternatives: capture_list(section, &ALTERNATIVES_PATTERN, looks_like_item_name),
        confidence: Some("high".to_string()),
    }
}

/// Capture a block, split it into list entries, and keep the first few that
/// pass the filter.
fn capture_list(section: &str, pattern: &Regex, keep: fn(&str) -> bool) -> Vec<String> {
    let Some(block) = pattern
        .captures(section)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Vec::new();
    };

    LIST_SEPARATOR
        .split(block)
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && keep(entry))
        .take(MAX_LIST_ENTRIES)
        .map(str::to_string)
        .collect()
}

/// Reference entries must look like product names: long enough, with at
/// least one latin letter. Filters out stray prose fragments.
fn looks_like_item_name(entry: &str) -> bool {
    entry.chars().count() > 3 && entry.chars().any(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Case #1
类别: 越野-泥地防滑
查询: "雨后山路泥地，求抓地力强的越野鞋，预算800左右"
体重: 70kg
must_have: 抓地力, 防滑
must_not: Nike Pegasus/Vomero(公路鞋), 普通公路鞋
推荐: Saucony Peregrine 14, Salomon Speedcross 6
备选: Hoka Speedgoat 5
confidence: high

Case #2
分类: 大体重缓震
查询: "90kg大体重新手求缓震跑鞋"
must_not: Nike Vaporfly(大体重不适合)
推荐: New Balance 1080v14, Asics Gel-Nimbus 26

Case 3
这一段没有查询字段，应当被丢弃。
"#;

    #[test]
    fn test_extracts_well_formed_cases() {
        let file = extract_cases(SAMPLE, "test extraction");
        assert_eq!(file.version, "2.0");
        assert_eq!(file.cases.len(), 2);
        assert_eq!(file.cases[0].id, 1);
        assert_eq!(file.cases[1].id, 2);
    }

    #[test]
    fn test_labeled_fields() {
        let file = extract_cases(SAMPLE, "test");
        let case = file.case(1).unwrap();
        assert_eq!(case.category, "越野-泥地防滑");
        assert!(case.query.contains("越野鞋"));
        assert_eq!(
            case.hard_constraints.must_not,
            vec!["Nike Pegasus/Vomero(公路鞋)", "普通公路鞋"]
        );
        assert_eq!(
            case.soft_reference.suggested_shoes,
            vec!["Saucony Peregrine 14", "Salomon Speedcross 6"]
        );
        assert_eq!(case.soft_reference.alternatives, vec!["Hoka Speedgoat 5"]);
    }

    #[test]
    fn test_profile_submatchers() {
        let file = extract_cases(SAMPLE, "test");
        let profile = file.case(1).unwrap().profile.as_ref().unwrap();
        assert_eq!(profile.get("weight").unwrap(), "70kg");
    }

    #[test]
    fn test_section_without_query_dropped() {
        let file = extract_cases(SAMPLE, "test");
        assert!(file.case(3).is_none());
    }

    #[test]
    fn test_category_inferred_from_keywords() {
        let text = r#"
Case #5
查询: "宽脚跑者，常规鞋挤脚磨泡，求宽楦跑鞋推荐建议"
推荐: Altra Torin 7
"#;
        let file = extract_cases(text, "test");
        assert_eq!(file.case(5).unwrap().category, "足型-宽脚");
    }

    #[test]
    fn test_unlabeled_unmatched_category_defaults() {
        let text = r#"
Case #6
查询: "有没有适合夏天通勤穿着的透气跑步鞋推荐一下"
"#;
        let file = extract_cases(text, "test");
        assert_eq!(file.case(6).unwrap().category, "未分类");
    }

    #[test]
    fn test_reference_entries_filtered() {
        // Entries that are too short or carry no latin letters are prose,
        // not product names.
        let text = r#"
Case #7
查询: "慢速跑者想体验碳板竞速鞋的推进感，有什么选择"
推荐: 详见下文, Adidas Adios Pro 3, ok
"#;
        let file = extract_cases(text, "test");
        assert_eq!(
            file.case(7).unwrap().soft_reference.suggested_shoes,
            vec!["Adidas Adios Pro 3"]
        );
    }

    #[test]
    fn test_list_caps_at_three() {
        let text = r#"
Case #8
查询: "大体重新手求一双耐用的慢跑训练鞋，不要太窄的"
must_not: Shoe A, Shoe B, Shoe C, Shoe D
"#;
        let file = extract_cases(text, "test");
        assert_eq!(file.case(8).unwrap().hard_constraints.must_not.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let text = r#"
Case #9
类别: A
查询: "第一段的查询内容，长度超过二十个字符没问题"

Case #9
类别: B
查询: "第二段的查询内容，长度超过二十个字符没问题"
"#;
        let file = extract_cases(text, "test");
        assert_eq!(file.cases.len(), 1);
        assert_eq!(file.case(9).unwrap().category, "A");
    }

    #[test]
    fn test_empty_text() {
        let file = extract_cases("", "empty");
        assert!(file.cases.is_empty());
    }
}
