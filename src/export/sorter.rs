use std::cmp::Ordering;

use crate::scene::types::SceneObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending by [`SceneObject::sort_priority`].
    #[default]
    PriorityValue,
    NameAscending,
    NameDescending,
}

pub struct GroupSorter {}

impl GroupSorter {
    /// Orders the groups for the GROUPS section. The sort is stable, so equal keys keep the order in
    /// which the objects were encountered in the scene.
    pub fn sort<T>(entries: &mut [(&SceneObject, T)], mode: SortMode) {
        entries.sort_by(|(a, _), (b, _)| GroupSorter::compare(a, b, mode));
    }

    fn compare(a: &SceneObject, b: &SceneObject, mode: SortMode) -> Ordering {
        match mode {
            SortMode::PriorityValue => a.sort_priority.cmp(&b.sort_priority),
            SortMode::NameAscending => a.name.cmp(&b.name),
            SortMode::NameDescending => b.name.cmp(&a.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, priority: i32) -> SceneObject {
        SceneObject {
            sort_priority: priority,
            ..SceneObject::new(name)
        }
    }

    fn sorted_names(objects: &[SceneObject], mode: SortMode) -> Vec<String> {
        let mut entries: Vec<_> = objects.iter().map(|o| (o, ())).collect();
        GroupSorter::sort(&mut entries, mode);
        entries.iter().map(|(o, _)| o.name.clone()).collect()
    }

    #[test]
    fn priority_ties_keep_scene_order() {
        let objects = vec![object("Hull", 50), object("Window", 90), object("Antenna", 50), object("Base", 10)];
        assert_eq!(
            sorted_names(&objects, SortMode::PriorityValue),
            vec!["Base", "Hull", "Antenna", "Window"]
        );
    }

    #[test]
    fn descending_is_reverse_of_ascending() {
        let objects = vec![object("b", 0), object("C", 0), object("a", 0), object("c", 0)];
        let mut ascending = sorted_names(&objects, SortMode::NameAscending);
        assert_eq!(ascending, vec!["C", "a", "b", "c"]);

        ascending.reverse();
        assert_eq!(sorted_names(&objects, SortMode::NameDescending), ascending);
    }
}
