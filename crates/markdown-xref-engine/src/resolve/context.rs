use std::collections::HashMap;
use std::sync::Arc;

use super::fragment::{fragment_name, is_always_valid};
use super::labels::normalize_label;
use super::types::{Anchor, ReferenceDefinition, ReferenceUsage};
use crate::snapshot::Snapshot;

/// Resolved cross-reference graph of one snapshot. Read-only once built.
#[derive(Debug, Clone)]
pub struct Context {
    snapshot: Arc<Snapshot>,
    definitions: Vec<ReferenceDefinition>,
    /// normalized label → index of the winning definition
    winning: HashMap<String, usize>,
    usages: Vec<ReferenceUsage>,
    anchors: Vec<Anchor>,
    anchor_ids: HashMap<String, Vec<usize>>,
    /// lowercased id → first anchor with that id in any case
    anchor_ids_folded: HashMap<String, usize>,
}

impl Context {
    pub(super) fn build(
        snapshot: Arc<Snapshot>,
        mut definitions: Vec<ReferenceDefinition>,
        mut usages: Vec<ReferenceUsage>,
        anchors: Vec<Anchor>,
    ) -> Self {
        let mut winning = HashMap::new();
        for (index, definition) in definitions.iter().enumerate() {
            if !definition.is_duplicate {
                winning
                    .entry(definition.normalized_label.clone())
                    .or_insert(index);
            }
        }

        for usage in &mut usages {
            let Some(label) = usage.normalized_label.as_deref().filter(|l| !l.is_empty()) else {
                continue;
            };
            if let Some(&index) = winning.get(label) {
                usage.resolved_definition = Some(index);
                definitions[index].usage_count += 1;
            }
        }

        let mut anchor_ids: HashMap<String, Vec<usize>> = HashMap::new();
        let mut anchor_ids_folded = HashMap::new();
        for (index, anchor) in anchors.iter().enumerate() {
            anchor_ids.entry(anchor.id.clone()).or_default().push(index);
            anchor_ids_folded
                .entry(anchor.id.to_lowercase())
                .or_insert(index);
        }

        Self {
            snapshot,
            definitions,
            winning,
            usages,
            anchors,
            anchor_ids,
            anchor_ids_folded,
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// The winning definition for `label`, in any spelling that normalizes
    /// to the same key.
    pub fn definition(&self, label: &str) -> Option<&ReferenceDefinition> {
        self.winning
            .get(&normalize_label(label))
            .map(|&index| &self.definitions[index])
    }

    /// All definitions in document order, duplicates included.
    pub fn definitions(&self) -> &[ReferenceDefinition] {
        &self.definitions
    }

    pub fn duplicate_definitions(&self) -> impl Iterator<Item = &ReferenceDefinition> {
        self.definitions.iter().filter(|d| d.is_duplicate)
    }

    /// Winning definitions no usage resolved to.
    pub fn unused_definitions(&self) -> impl Iterator<Item = &ReferenceDefinition> {
        self.definitions
            .iter()
            .filter(|d| !d.is_duplicate && d.usage_count == 0)
    }

    pub fn usages(&self) -> &[ReferenceUsage] {
        &self.usages
    }

    /// Reference-style usages whose label has no definition.
    pub fn unresolved_usages(&self) -> impl Iterator<Item = &ReferenceUsage> {
        self.usages.iter().filter(|u| {
            u.normalized_label.as_deref().is_some_and(|l| !l.is_empty())
                && u.resolved_definition.is_none()
        })
    }

    pub fn resolved_definition(&self, usage: &ReferenceUsage) -> Option<&ReferenceDefinition> {
        usage
            .resolved_definition
            .and_then(|index| self.definitions.get(index))
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// First anchor with exactly this id.
    pub fn anchor(&self, id: &str) -> Option<&Anchor> {
        self.anchors_for(id).next()
    }

    pub fn anchors_for(&self, id: &str) -> impl Iterator<Item = &Anchor> {
        self.anchor_ids
            .get(id)
            .into_iter()
            .flatten()
            .map(|&index| &self.anchors[index])
    }

    pub fn anchor_case_insensitive(&self, id: &str) -> Option<&Anchor> {
        self.anchor_ids_folded
            .get(&id.to_lowercase())
            .map(|&index| &self.anchors[index])
    }

    /// Whether `fragment` (with or without the leading `#`) names a target
    /// in this document. Matching is exact; see
    /// [`anchor_case_insensitive`](Self::anchor_case_insensitive).
    pub fn is_valid_fragment(&self, fragment: &str) -> bool {
        is_always_valid(fragment) || self.anchor_ids.contains_key(fragment_name(fragment))
    }

    /// In-document links whose fragment matches no anchor.
    pub fn invalid_fragments(&self) -> impl Iterator<Item = &ReferenceUsage> {
        self.usages
            .iter()
            .filter(|u| u.is_in_document() && !self.is_valid_fragment(&u.fragment))
    }
}
