use super::*;
use crate::model::BoxContent;

fn titles(state: &LayoutState) -> Vec<&str> {
    state.columns.iter().map(|c| c.title.as_str()).collect()
}

fn section_titles(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.title.as_str()).collect()
}

fn box_texts(state: &LayoutState, column: &str, section: &str) -> Vec<String> {
    state
        .section(column, section)
        .unwrap()
        .boxes
        .iter()
        .map(|b| b.text.clone())
        .collect()
}

/// One column with sections S1..S3, each holding a single box.
fn three_sections() -> (LayoutState, String, Vec<String>) {
    let mut state = LayoutState::new();
    let col = state.add_column("Col");
    let ids = ["S1", "S2", "S3"]
        .iter()
        .map(|t| {
            let id = state.add_section(&col, *t).unwrap();
            state.add_box(&col, &id, BoxPatch::text(format!("{t} box"))).unwrap();
            id
        })
        .collect();
    (state, col, ids)
}

#[test]
fn test_add_column_defaults() {
    let mut state = LayoutState::new();
    let id = state.add_column("First");
    let column = state.column(&id).unwrap();
    assert_eq!(column.width, crate::model::DEFAULT_COLUMN_WIDTH);
    assert!(!column.is_split());
    assert_eq!(column.sections.total(), 0);
}

#[test]
fn test_move_column_reorders() {
    let mut state = LayoutState::new();
    state.add_column("A");
    state.add_column("B");
    state.move_column(0, 1).unwrap();
    assert_eq!(titles(&state), vec!["B", "A"]);
}

#[test]
fn test_move_column_clamps_target_and_rejects_bad_source() {
    let mut state = LayoutState::new();
    state.add_column("A");
    state.add_column("B");
    state.add_column("C");
    state.move_column(0, 99).unwrap();
    assert_eq!(titles(&state), vec!["B", "C", "A"]);

    let before = state.clone();
    assert_eq!(
        state.move_column(5, 0),
        Err(LayoutError::IndexOutOfRange { index: 5, len: 3 })
    );
    assert_eq!(state, before);
}

#[test]
fn test_delete_column_clears_selection() {
    let mut state = LayoutState::new();
    let id = state.add_column("A");
    state.select_column(Some(id.clone()));
    state.delete_column(&id).unwrap();
    assert!(state.selection.column.is_none());
    assert!(state.columns.is_empty());
}

#[test]
fn test_deleted_column_is_unreachable() {
    let mut state = LayoutState::new();
    let id = state.add_column("A");
    let keep = state.add_column("B");
    state.delete_column(&id).unwrap();
    let before = state.clone();

    assert!(matches!(state.add_section(&id, "x"), Err(LayoutError::ColumnNotFound(_))));
    assert!(state.split_column(&id, 2).is_err());
    assert!(state.clone_column(&id).is_err());
    assert!(state.update_column(&id, ColumnPatch::title("y")).is_err());
    assert!(state.move_section(&id, &keep, "s", None).is_err());
    assert!(state.delete_column(&id).is_err());
    assert_eq!(state, before);
}

#[test]
fn test_split_distributes_round_robin() {
    let (mut state, col, _) = three_sections();
    state.split_column(&col, 2).unwrap();
    let parts = state.column(&col).unwrap().sections.parts().unwrap().clone();
    assert_eq!(parts.len(), 2);
    assert_eq!(section_titles(&parts[0]), vec!["S1", "S3"]);
    assert_eq!(section_titles(&parts[1]), vec!["S2"]);
}

#[test]
fn test_split_then_unsplit_keeps_order() {
    let (mut state, col, ids) = three_sections();
    state.split_column(&col, 2).unwrap();
    state.unsplit_column(&col).unwrap();
    let flat = state.column(&col).unwrap().sections.flat().unwrap();
    assert_eq!(flat.len(), ids.len());
    // concatenation of part 0 then part 1
    assert_eq!(section_titles(flat), vec!["S1", "S3", "S2"]);
}

#[test]
fn test_split_empty_column_gets_placeholders() {
    let mut state = LayoutState::new();
    let col = state.add_column("Empty");
    state.split_column(&col, 3).unwrap();
    let parts = state.column(&col).unwrap().sections.parts().unwrap();
    assert_eq!(parts.len(), 3);
    for (i, part) in parts.iter().enumerate() {
        assert_eq!(section_titles(part), vec![format!("Part {}", i + 1).as_str()]);
    }
}

#[test]
fn test_split_part_count_is_bounded() {
    let (mut state, col, _) = three_sections();
    let before = state.clone();
    assert_eq!(state.split_column(&col, 1), Err(LayoutError::InvalidSplitParts(1)));
    assert_eq!(state.split_column(&col, 9), Err(LayoutError::InvalidSplitParts(9)));
    assert_eq!(state, before);
}

#[test]
fn test_resplit_redistributes_everything() {
    let (mut state, col, _) = three_sections();
    state.split_column(&col, 2).unwrap();
    state.split_column(&col, 3).unwrap();
    let column = state.column(&col).unwrap();
    assert_eq!(column.split_parts(), 3);
    assert_eq!(column.sections.total(), 3);
}

#[test]
fn test_unsplit_normal_column_errors() {
    let (mut state, col, _) = three_sections();
    assert_eq!(state.unsplit_column(&col), Err(LayoutError::NotSplit(col.clone())));
}

#[test]
fn test_section_ops_reject_split_columns() {
    let (mut state, col, ids) = three_sections();
    state.split_column(&col, 2).unwrap();
    let before = state.clone();
    assert_eq!(state.add_section(&col, "x"), Err(LayoutError::SplitMode(col.clone())));
    assert!(state.delete_section(&col, &ids[0]).is_err());
    assert!(state.clone_section(&col, &ids[0]).is_err());
    assert!(state.add_box(&col, &ids[0], BoxPatch::default()).is_err());
    assert_eq!(state, before);
}

#[test]
fn test_add_section_to_part() {
    let (mut state, col, _) = three_sections();
    state.split_column(&col, 2).unwrap();
    state.add_section_to_part(&col, 1, "Extra").unwrap();
    let parts = state.column(&col).unwrap().sections.parts().unwrap();
    assert_eq!(section_titles(&parts[1]), vec!["S2", "Extra"]);
    assert_eq!(
        state.add_section_to_part(&col, 2, "Nope"),
        Err(LayoutError::PartOutOfRange { column: col.clone(), part: 2 })
    );
}

#[test]
fn test_move_section_within_same_column() {
    let (mut state, col, ids) = three_sections();
    state.move_section(&col, &col, &ids[2], Some(0)).unwrap();
    let flat = state.column(&col).unwrap().sections.flat().unwrap();
    assert_eq!(section_titles(flat), vec!["S3", "S1", "S2"]);
}

#[test]
fn test_move_section_into_split_column_is_rejected() {
    let (mut state, col, ids) = three_sections();
    let other = state.add_column("Other");
    state.split_column(&other, 2).unwrap();
    let before = state.clone();
    assert_eq!(
        state.move_section(&col, &other, &ids[0], None),
        Err(LayoutError::SplitMode(other.clone()))
    );
    assert_eq!(state, before);
}

#[test]
fn test_move_section_to_part() {
    let (mut state, col, ids) = three_sections();
    let target = state.add_column("Target");
    state.split_column(&target, 2).unwrap();
    state
        .move_section_to_part(&col, &ids[1], &target, 1, Some(0))
        .unwrap();
    let parts = state.column(&target).unwrap().sections.parts().unwrap();
    assert_eq!(section_titles(&parts[1]), vec!["S2", "Part 2"]);
    assert_eq!(state.column(&col).unwrap().sections.total(), 2);
    let location = state.find_section(&ids[1]).unwrap();
    assert_eq!(location.column, target);
    assert_eq!(location.part, Some(1));
}

#[test]
fn test_clone_section_and_column_fresh_ids() {
    let (mut state, col, ids) = three_sections();
    let copy_id = state.clone_section(&col, &ids[0]).unwrap();
    let flat = state.column(&col).unwrap().sections.flat().unwrap();
    assert_eq!(section_titles(flat), vec!["S1", "S1 (Copy)", "S2", "S3"]);
    assert_ne!(flat[0].boxes[0].id, flat[1].boxes[0].id);
    assert_eq!(flat[0].boxes[0].text, flat[1].boxes[0].text);
    assert_ne!(copy_id, ids[0]);

    let cloned = state.clone_column(&col).unwrap();
    assert_eq!(titles(&state), vec!["Col", "Col (Copy)"]);
    let original_ids: Vec<_> = state.columns[0].sections.iter().map(|s| s.id.clone()).collect();
    for section in state.column(&cloned).unwrap().sections.iter() {
        assert!(!original_ids.contains(&section.id));
    }
}

#[test]
fn test_clone_section_to_keeps_title() {
    let (mut state, col, ids) = three_sections();
    let other = state.add_column("Other");
    let id = state.clone_section_to(&col, &ids[0], &other, None, None).unwrap();
    let copy = state.section(&other, &id).unwrap();
    assert_eq!(copy.title, "S1");
    assert_eq!(state.column(&col).unwrap().sections.total(), 3);
}

#[test]
fn test_add_box_then_move_to_front_of_other_section() {
    let (mut state, col, ids) = three_sections();
    let empty = state.add_section(&col, "Empty").unwrap();
    let new_box = state.add_box(&col, &empty, BoxPatch::default()).unwrap();
    state
        .move_box(&col, &empty, &col, &ids[0], &new_box, Some(0))
        .unwrap();
    assert_eq!(box_texts(&state, &col, &ids[0]), vec!["New Box", "S1 box"]);
    assert!(box_texts(&state, &col, &empty).is_empty());
}

#[test]
fn test_move_box_and_back_restores_order() {
    let (mut state, col, ids) = three_sections();
    let extra = state.add_box(&col, &ids[0], BoxPatch::text("second")).unwrap();
    let snapshot = state.clone();
    state.move_box(&col, &ids[0], &col, &ids[1], &extra, None).unwrap();
    assert_eq!(box_texts(&state, &col, &ids[1]), vec!["S2 box", "second"]);
    state.move_box(&col, &ids[1], &col, &ids[0], &extra, Some(1)).unwrap();
    assert_eq!(state, snapshot);
}

#[test]
fn test_move_box_within_same_section() {
    let (mut state, col, ids) = three_sections();
    let second = state.add_box(&col, &ids[0], BoxPatch::text("second")).unwrap();
    state.move_box(&col, &ids[0], &col, &ids[0], &second, Some(0)).unwrap();
    assert_eq!(box_texts(&state, &col, &ids[0]), vec!["second", "S1 box"]);
}

#[test]
fn test_move_box_to_missing_section_keeps_box() {
    let (mut state, col, ids) = three_sections();
    let box_id = state.section(&col, &ids[0]).unwrap().boxes[0].id.clone();
    assert_eq!(state.find_box(&box_id), Some((col.clone(), ids[0].clone())));
    let before = state.clone();
    assert!(state.move_box(&col, &ids[0], &col, "missing", &box_id, None).is_err());
    assert_eq!(state, before);
}

#[test]
fn test_update_box_merges() {
    let (mut state, col, ids) = three_sections();
    let box_id = state.section(&col, &ids[0]).unwrap().boxes[0].id.clone();
    state
        .update_box(
            &col,
            &ids[0],
            &box_id,
            BoxPatch {
                content: Some(BoxContent::Line { style: "line-dashed".into() }),
                ..BoxPatch::default()
            },
        )
        .unwrap();
    let updated = &state.section(&col, &ids[0]).unwrap().boxes[0];
    assert_eq!(updated.text, "S1 box");
    assert!(updated.content.is_line());
}

#[test]
fn test_delete_box_clears_selection() {
    let (mut state, col, ids) = three_sections();
    let box_id = state.section(&col, &ids[0]).unwrap().boxes[0].id.clone();
    state.select_box(Some(box_id.clone()));
    state.delete_box(&col, &ids[0], &box_id).unwrap();
    assert!(state.selection.box_id.is_none());
    assert_eq!(
        state.delete_box(&col, &ids[0], &box_id),
        Err(LayoutError::BoxNotFound(box_id))
    );
}

#[test]
fn test_rehydrate_replays_with_fresh_ids() {
    let (mut state, col, _) = three_sections();
    state
        .update_column(&col, ColumnPatch { width: Some(550), ..ColumnPatch::default() })
        .unwrap();
    let split = state.add_column("Split");
    state.split_column(&split, 2).unwrap();
    let snapshot = state.columns.clone();

    let mut restored = LayoutState::new();
    restored.add_column("stale");
    restored.rehydrate(&snapshot).unwrap();

    assert_eq!(titles(&restored), vec!["Col", "Split"]);
    assert_ne!(restored.columns[0].id, snapshot[0].id);
    assert_eq!(restored.columns[0].width, 550);
    let texts: Vec<_> = restored.columns[0]
        .sections
        .iter()
        .flat_map(|s| s.boxes.iter().map(|b| b.text.clone()))
        .collect();
    assert_eq!(texts, vec!["S1 box", "S2 box", "S3 box"]);
    assert_eq!(restored.columns[1].split_parts(), 2);
}

fn part_titles(state: &LayoutState, index: usize) -> Vec<Vec<&str>> {
    state.columns[index]
        .sections
        .parts()
        .unwrap()
        .iter()
        .map(|part| section_titles(part))
        .collect()
}

#[test]
fn test_rehydrate_keeps_sections_in_their_parts() {
    let mut state = LayoutState::new();
    let col = state.add_column("Split");
    let ids: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|t| state.add_section(&col, *t).unwrap())
        .collect();
    state.add_box(&col, &ids[2], BoxPatch::text("C box")).unwrap();
    state.split_column(&col, 2).unwrap();
    state.move_section_to_part(&col, &ids[2], &col, 1, None).unwrap();
    assert_eq!(part_titles(&state, 0), vec![vec!["A"], vec!["B", "C"]]);
    let snapshot = state.columns.clone();

    let mut restored = LayoutState::new();
    restored.rehydrate(&snapshot).unwrap();
    assert_eq!(part_titles(&restored, 0), vec![vec!["A"], vec!["B", "C"]]);
    let parts = restored.columns[0].sections.parts().unwrap();
    assert_eq!(parts[1][1].boxes[0].text, "C box");
    assert_ne!(parts[1][1].id, ids[2]);
}

#[test]
fn test_rehydrate_empty_split_column_stays_empty() {
    let mut state = LayoutState::new();
    state.add_column("Empty");
    state.columns[0].sections = Sections::Split(vec![Vec::new(); 3]);
    let snapshot = state.columns.clone();

    let mut restored = LayoutState::new();
    restored.rehydrate(&snapshot).unwrap();
    assert_eq!(restored.columns[0].split_parts(), 3);
    assert_eq!(restored.columns[0].sections.total(), 0);
}

#[test]
fn test_demo_layout() {
    let state = LayoutState::demo();
    assert_eq!(titles(&state), vec!["Welcome to Explainator", "Features"]);
    assert_eq!(state.columns[1].sections.iter().next().unwrap().boxes.len(), 4);
}

#[test]
fn test_apply_all_skips_failures() {
    let mut state = LayoutState::new();
    let a = state.add_column("A");
    state.add_column("B");
    let ops = vec![
        LayoutOp::SplitColumn { column: "missing".into(), parts: 2 },
        LayoutOp::MoveColumn { from: 0, to: 1 },
        LayoutOp::SplitColumn { column: a.clone(), parts: 2 },
    ];
    assert_eq!(state.apply_all(&ops), 2);
    assert_eq!(titles(&state), vec!["B", "A"]);
    assert!(state.column(&a).unwrap().is_split());
}

#[test]
fn test_layout_serializes_columns_only() {
    let mut state = LayoutState::demo();
    let first = state.columns[0].id.clone();
    state.select_column(Some(first));
    let value = serde_json::to_value(&state).unwrap();
    assert!(value.get("selection").is_none());
    let back: LayoutState = serde_json::from_value(value).unwrap();
    assert_eq!(back.columns, state.columns);
}
