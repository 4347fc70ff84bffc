//! Department → class → section tree over a flat assignment list.

use std::collections::HashMap;
use crate::models::AssignmentRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionGroup<'a> {
    pub section_id: &'a str,
    pub label: String,
    pub records: Vec<&'a AssignmentRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassGroup<'a> {
    pub class_id: &'a str,
    pub label: String,
    pub sections: Vec<SectionGroup<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentGroup<'a> {
    pub department_id: &'a str,
    pub label: String,
    pub classes: Vec<ClassGroup<'a>>,
}

impl DepartmentGroup<'_> {
    pub fn assignment_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| &c.sections)
            .map(|s| s.records.len())
            .sum()
    }
}

/// Key used for the per-section expand flag.
pub fn section_key(department_id: &str, class_id: &str, section_id: &str) -> String {
    format!("{}-{}-{}", department_id, class_id, section_id)
}

/// Finds the bucket for `key` in `buckets`, creating it at the end on first sight.
fn bucket<'v, T>(
    buckets: &'v mut Vec<T>,
    index: &mut HashMap<String, usize>,
    key: String,
    create: impl FnOnce() -> T,
) -> &'v mut T {
    let position = *index.entry(key).or_insert_with(|| {
        buckets.push(create());
        buckets.len() - 1
    });
    &mut buckets[position]
}

/// Groups by department, class, then section, keeping first-seen order at every level.
pub fn group(records: &[AssignmentRecord]) -> Vec<DepartmentGroup<'_>> {
    let mut departments: Vec<DepartmentGroup> = Vec::new();
    let mut department_index = HashMap::new();
    let mut class_index = HashMap::new();
    let mut section_index = HashMap::new();

    for record in records {
        let department = bucket(&mut departments, &mut department_index, record.department_id.clone(), || DepartmentGroup {
            department_id: &record.department_id,
            label: record.department_name.clone().unwrap_or_else(|| record.department_id.clone()),
            classes: Vec::new(),
        });
        let class = bucket(
            &mut department.classes,
            &mut class_index,
            format!("{}-{}", record.department_id, record.class_id),
            || ClassGroup {
                class_id: &record.class_id,
                label: record.class_name.clone().unwrap_or_else(|| record.class_id.clone()),
                sections: Vec::new(),
            },
        );
        let section = bucket(
            &mut class.sections,
            &mut section_index,
            section_key(&record.department_id, &record.class_id, &record.section_id),
            || SectionGroup {
                section_id: &record.section_id,
                label: record.section_name.clone().unwrap_or_else(|| record.section_id.clone()),
                records: Vec::new(),
            },
        );
        section.records.push(record);
    }

    departments
}

/// Expand/collapse flags. Purely view state; grouping never reads it.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    departments: HashMap<String, bool>,
    sections: HashMap<String, bool>,
}

impl Expansion {
    pub fn toggle_department(&mut self, id: &str) {
        let flag = self.departments.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn toggle_section(&mut self, composite_key: &str) {
        let flag = self.sections.entry(composite_key.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn is_department_open(&self, id: &str) -> bool {
        self.departments.get(id).copied().unwrap_or(false)
    }

    pub fn is_section_open(&self, composite_key: &str) -> bool {
        self.sections.get(composite_key).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, dept: &str, class: &str, section: &str) -> AssignmentRecord {
        AssignmentRecord {
            id: id.to_string(),
            department_id: dept.to_string(),
            class_id: class.to_string(),
            section_id: section.to_string(),
            teacher_id: format!("t-{}", id),
            subject_ids: vec![],
            is_class_teacher: false,
            department_name: None,
            class_name: None,
            section_name: None,
            teacher_name: None,
            subject_names: vec![],
        }
    }

    fn shape(tree: &[DepartmentGroup]) -> Vec<(String, String, String, Vec<String>)> {
        let mut out = Vec::new();
        for d in tree {
            for c in &d.classes {
                for s in &c.sections {
                    out.push((
                        d.department_id.to_string(),
                        c.class_id.to_string(),
                        s.section_id.to_string(),
                        s.records.iter().map(|r| r.id.clone()).collect(),
                    ));
                }
            }
        }
        out
    }

    #[test]
    fn groups_in_first_seen_order() {
        let records = vec![
            record("1", "science", "10", "B"),
            record("2", "arts", "9", "A"),
            record("3", "science", "8", "A"),
            record("4", "science", "10", "A"),
            record("5", "science", "10", "B"),
        ];
        let tree = group(&records);
        assert_eq!(tree.iter().map(|d| d.department_id).collect::<Vec<_>>(), vec!["science", "arts"]);
        assert_eq!(tree[0].classes.iter().map(|c| c.class_id).collect::<Vec<_>>(), vec!["10", "8"]);
        assert_eq!(tree[0].classes[0].sections.iter().map(|s| s.section_id).collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(
            tree[0].classes[0].sections[0].records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "5"]
        );
        assert_eq!(tree[0].assignment_count(), 4);
    }

    #[test]
    fn grouping_twice_is_identical() {
        let records = vec![
            record("1", "d2", "c1", "s1"),
            record("2", "d1", "c1", "s1"),
            record("3", "d2", "c2", "s1"),
            record("4", "d1", "c1", "s2"),
        ];
        assert_eq!(shape(&group(&records)), shape(&group(&records)));
    }

    #[test]
    fn same_class_id_in_two_departments_stays_apart() {
        let records = vec![record("1", "d1", "c1", "s1"), record("2", "d2", "c1", "s1")];
        let tree = group(&records);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].classes[0].sections[0].records[0].id, "2");
    }

    #[test]
    fn labels_fall_back_to_ids() {
        let mut named = record("1", "d1", "c1", "s1");
        named.department_name = Some("Science".into());
        let tree = group(std::slice::from_ref(&named));
        assert_eq!(tree[0].label, "Science");
        assert_eq!(tree[0].classes[0].label, "c1");
    }

    #[test]
    fn toggles_are_independent() {
        let mut expansion = Expansion::default();
        expansion.toggle_department("d1");
        expansion.toggle_section(&section_key("d1", "c1", "s1"));
        expansion.toggle_section(&section_key("d1", "c1", "s1"));
        assert!(expansion.is_department_open("d1"));
        assert!(!expansion.is_department_open("d2"));
        assert!(!expansion.is_section_open("d1-c1-s1"));
    }
}
