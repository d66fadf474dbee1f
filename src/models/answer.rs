use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 用户作答状态：题目索引 -> 答案
///
/// 只在会话内存在，不做持久化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerState(BTreeMap<usize, String>);

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// 写入答案，后写覆盖先写
    pub(crate) fn insert(&mut self, index: usize, value: String) {
        self.0.insert(index, value);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, v)| (*i, v.as_str()))
    }
}

impl<const N: usize> From<[(usize, &str); N]> for AnswerState {
    fn from(pairs: [(usize, &str); N]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(i, v)| (*i, v.to_string()))
                .collect(),
        )
    }
}
