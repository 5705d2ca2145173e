#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::{ResizeEffect, ResizeState, Workspace};
    use dockyard_core::{
        Axis, DragPayload, DropRejection, DropZone, ItemSpec, LayoutError, LayoutSettings,
        NodeId, NodeSpec, PointerEvent, Rect, Signal, Vec2,
    };

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn rect_approx_eq(a: &Rect, b: &Rect) -> bool {
        approx_eq(a.x, b.x)
            && approx_eq(a.y, b.y)
            && approx_eq(a.width, b.width)
            && approx_eq(a.height, b.height)
    }

    fn weights_approx_eq(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    fn solved(spec: NodeSpec, width: f32, height: f32) -> Workspace {
        let mut ws = Workspace::build(&spec, LayoutSettings::default()).unwrap();
        ws.set_viewport(Rect::new(0.0, 0.0, width, height));
        ws
    }

    fn group_of_tab(ws: &Workspace, tab: &str) -> NodeId {
        ws.group_of(ws.find_item(tab).unwrap()).unwrap()
    }

    fn rect_of_tab(ws: &Workspace, tab: &str) -> Rect {
        ws.node(group_of_tab(ws, tab)).unwrap().rect().unwrap()
    }

    fn root_weights(ws: &Workspace) -> Vec<f32> {
        ws.root().unwrap().as_container().unwrap().weights().to_vec()
    }

    fn active_tab(ws: &Workspace, group: NodeId) -> String {
        ws.group(group).unwrap().active_item().unwrap().tab_id().to_string()
    }

    fn count_signals(ws: &Workspace) -> Rc<RefCell<Vec<Signal>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ws.subscribe(move |s| sink.borrow_mut().push(s));
        seen
    }

    fn two_columns() -> NodeSpec {
        NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])],
        )
    }

    fn at(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    // ──────────────────────────────────────────
    // Construction
    // ──────────────────────────────────────────

    #[test]
    fn test_default_is_empty() {
        let ws = Workspace::default();
        assert!(ws.is_empty());
        assert!(ws.rects().is_empty());
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_with_group_fills_viewport() {
        let (mut ws, group) = Workspace::with_group(["editor", "terminal"]).unwrap();
        ws.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        let rects = ws.rects();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0, group);
        assert!(rect_approx_eq(&rects[0].1, &Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert_eq!(active_tab(&ws, group), "editor");
    }

    #[test]
    fn test_with_group_without_tabs_is_none() {
        assert!(Workspace::with_group(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_build_rejects_empty_nodes() {
        let empty_container = NodeSpec::container(Axis::Row, vec![]);
        assert!(matches!(
            Workspace::build(&empty_container, LayoutSettings::default()),
            Err(LayoutError::InvalidSpec(_))
        ));
        let empty_group = NodeSpec::group(Vec::<String>::new());
        assert!(matches!(
            Workspace::build(&empty_group, LayoutSettings::default()),
            Err(LayoutError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_build_validates_and_normalizes_weights() {
        let mismatched = NodeSpec::Container {
            axis: Axis::Column,
            children: vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])],
            weights: Some(vec![1.0]),
            min_item_size: None,
            divider_tolerance: None,
        };
        assert!(Workspace::build(&mismatched, LayoutSettings::default()).is_err());

        let negative = NodeSpec::Container {
            axis: Axis::Column,
            children: vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])],
            weights: Some(vec![-1.0, 3.0]),
            min_item_size: None,
            divider_tolerance: None,
        };
        assert!(Workspace::build(&negative, LayoutSettings::default()).is_err());

        let scaled = NodeSpec::Container {
            axis: Axis::Column,
            children: vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])],
            weights: Some(vec![3.0, 1.0]),
            min_item_size: None,
            divider_tolerance: None,
        };
        let ws = solved(scaled, 800.0, 600.0);
        assert!(weights_approx_eq(&root_weights(&ws), &[1.5, 0.5]));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 600.0));
    }

    #[test]
    fn test_build_honours_active_index() {
        let spec = NodeSpec::Group {
            items: vec![ItemSpec::new("a"), ItemSpec::new("b"), ItemSpec::new("c")],
            active: Some(1),
            edge_margin_fraction: None,
            show_tabs: None,
            fixed_tabs: None,
        };
        let ws = Workspace::build(&spec, LayoutSettings::default()).unwrap();
        let group = ws.root().unwrap().id();
        assert_eq!(active_tab(&ws, group), "b");
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::container(Axis::Row, vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])]),
                NodeSpec::group(["c", "d"]),
            ],
        );
        let ws = solved(spec, 800.0, 600.0);
        let mut ids: Vec<NodeId> = ws.rects().into_iter().map(|(id, _)| id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 5);
    }

    // ──────────────────────────────────────────
    // Solving
    // ──────────────────────────────────────────

    #[test]
    fn test_column_divides_width() {
        let ws = solved(two_columns(), 800.0, 600.0);
        assert!(rect_approx_eq(&rect_of_tab(&ws, "a"), &Rect::new(0.0, 0.0, 400.0, 600.0)));
        assert!(rect_approx_eq(&rect_of_tab(&ws, "b"), &Rect::new(400.0, 0.0, 400.0, 600.0)));
    }

    #[test]
    fn test_row_divides_height() {
        let spec = NodeSpec::container(Axis::Row, vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])]);
        let ws = solved(spec, 800.0, 600.0);
        assert!(rect_approx_eq(&rect_of_tab(&ws, "a"), &Rect::new(0.0, 0.0, 800.0, 300.0)));
        assert!(rect_approx_eq(&rect_of_tab(&ws, "b"), &Rect::new(0.0, 300.0, 800.0, 300.0)));
    }

    #[test]
    fn test_siblings_tile_parent_exactly() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
        );
        let ws = solved(spec, 1000.0, 600.0);
        let total: f32 = ["a", "b", "c"].iter().map(|t| rect_of_tab(&ws, t).width).sum();
        assert_eq!(total, 1000.0);
        assert_eq!(rect_of_tab(&ws, "c").right(), 1000.0);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        let first = ws.rects();
        let weights = root_weights(&ws);
        assert!(ws.solve());
        assert_eq!(ws.rects(), first);
        assert_eq!(root_weights(&ws), weights);
    }

    #[test]
    fn test_solve_defers_without_viewport() {
        let mut ws = Workspace::build(&two_columns(), LayoutSettings::default()).unwrap();
        assert!(!ws.solve());
        assert!(ws.needs_solve());
        assert!(ws.rects().is_empty());
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) }), ResizeEffect::Ignored);

        ws.set_viewport(Rect::new(0.0, 0.0, 0.0, 600.0));
        assert!(ws.needs_solve());

        ws.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(!ws.needs_solve());
        assert_eq!(ws.rects().len(), 3);
    }

    #[test]
    fn test_viewport_change_keeps_proportions() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) });
        ws.pointer(PointerEvent::Down { position: at(400.0, 300.0) });
        ws.pointer(PointerEvent::Move { position: at(500.0, 300.0) });
        ws.pointer(PointerEvent::Up { position: at(500.0, 300.0) });

        ws.set_viewport(Rect::new(0.0, 0.0, 1600.0, 600.0));
        assert!(weights_approx_eq(&root_weights(&ws), &[1.25, 0.75]));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 1000.0));
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 600.0));
    }

    #[test]
    fn test_remeasure_rederives_weights() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        let root = ws.root().unwrap().id();
        let a = group_of_tab(&ws, "a");
        let b = group_of_tab(&ws, "b");
        let measured: HashMap<NodeId, Rect> = [
            (root, Rect::new(0.0, 0.0, 800.0, 600.0)),
            (a, Rect::new(0.0, 0.0, 600.0, 600.0)),
            (b, Rect::new(600.0, 0.0, 200.0, 600.0)),
        ]
        .into_iter()
        .collect();
        ws.remeasure(&measured);
        assert!(weights_approx_eq(&root_weights(&ws), &[1.5, 0.5]));
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 200.0));
    }

    #[test]
    fn test_template_rounds_for_display_only() {
        let spec = NodeSpec::Container {
            axis: Axis::Column,
            children: vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
            weights: Some(vec![1.0, 1.0, 1.0]),
            min_item_size: None,
            divider_tolerance: None,
        };
        let ws = solved(spec, 900.0, 600.0);
        let root = ws.root().unwrap().as_container().unwrap();
        assert_eq!(root.template(), "1.0000fr 1.0000fr 1.0000fr");
    }

    // ──────────────────────────────────────────
    // Deferred geometry
    // ──────────────────────────────────────────

    fn three_columns() -> NodeSpec {
        NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
        )
    }

    #[test]
    fn test_excision_while_deferred_keeps_folded_weights() {
        let mut ws = solved(three_columns(), 900.0, 600.0);
        ws.set_viewport(Rect::new(0.0, 0.0, 900.0, 0.0));
        assert!(ws.needs_solve());

        let b = ws.find_item("b").unwrap();
        assert!(ws.remove_item(b).is_some());
        assert!(weights_approx_eq(&root_weights(&ws), &[2.0 / 3.0, 4.0 / 3.0]));

        ws.set_viewport(Rect::new(0.0, 0.0, 900.0, 600.0));
        assert!(!ws.needs_solve());
        assert!(weights_approx_eq(&root_weights(&ws), &[2.0 / 3.0, 4.0 / 3.0]));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 300.0));
        assert!(approx_eq(rect_of_tab(&ws, "c").width, 600.0));
    }

    #[test]
    fn test_viewport_change_after_deferral_keeps_weights() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        ws.set_viewport(Rect::new(0.0, 0.0, 0.0, 0.0));
        ws.set_viewport(Rect::new(0.0, 0.0, 0.0, 600.0));
        ws.set_viewport(Rect::new(0.0, 0.0, 1000.0, 600.0));
        assert!(weights_approx_eq(&root_weights(&ws), &[1.0, 1.0]));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 500.0));
    }

    #[test]
    fn test_cancel_while_deferred_ends_gesture() {
        let mut ws = solved(three_columns(), 900.0, 600.0);
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(300.0, 300.0) }), ResizeEffect::Hover);
        assert_eq!(ws.pointer(PointerEvent::Down { position: at(300.0, 300.0) }), ResizeEffect::Pressed);

        ws.set_viewport(Rect::new(0.0, 0.0, 900.0, 0.0));
        assert!(ws.needs_solve());
        let seen = count_signals(&ws);

        assert_eq!(ws.pointer(PointerEvent::Cancel), ResizeEffect::Settled);
        assert_eq!(ws.resize_state(), ResizeState::Idle);
        assert_eq!(*seen.borrow(), vec![Signal::Layout]);
        assert!(ws.begin_drag(&DragPayload::tab("a")));
    }

    #[test]
    fn test_release_while_deferred_ends_gesture() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) });
        ws.pointer(PointerEvent::Down { position: at(400.0, 300.0) });
        ws.set_viewport(Rect::new(0.0, 0.0, 0.0, 600.0));

        assert_eq!(ws.pointer(PointerEvent::Move { position: at(450.0, 300.0) }), ResizeEffect::Ignored);
        assert_eq!(ws.pointer(PointerEvent::Up { position: at(450.0, 300.0) }), ResizeEffect::Settled);
        assert_eq!(ws.resize_state(), ResizeState::Idle);
    }

    // ──────────────────────────────────────────
    // Divider resize
    // ──────────────────────────────────────────

    #[test]
    fn test_resize_drag_then_cancel_keeps_new_sizes() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        let seen = count_signals(&ws);

        assert_eq!(ws.pointer(PointerEvent::Move { position: at(401.0, 300.0) }), ResizeEffect::Hover);
        assert_eq!(ws.pointer(PointerEvent::Down { position: at(400.0, 300.0) }), ResizeEffect::Pressed);
        assert!(ws.resize_state() != ResizeState::Idle);

        assert_eq!(ws.pointer(PointerEvent::Move { position: at(500.0, 300.0) }), ResizeEffect::Resized);
        assert!(weights_approx_eq(&root_weights(&ws), &[1.25, 0.75]));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 500.0));
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 300.0));

        assert_eq!(ws.pointer(PointerEvent::Cancel), ResizeEffect::Settled);
        assert_eq!(ws.resize_state(), ResizeState::Idle);
        assert!(weights_approx_eq(&root_weights(&ws), &[1.25, 0.75]));
        assert_eq!(*seen.borrow(), vec![Signal::Layout, Signal::Layout]);
    }

    #[test]
    fn test_resize_keeps_weight_sum() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
        );
        let mut ws = solved(spec, 900.0, 600.0);
        ws.pointer(PointerEvent::Move { position: at(600.0, 100.0) });
        ws.pointer(PointerEvent::Down { position: at(600.0, 100.0) });
        ws.pointer(PointerEvent::Move { position: at(543.0, 100.0) });
        ws.pointer(PointerEvent::Move { position: at(571.5, 100.0) });
        ws.pointer(PointerEvent::Up { position: at(571.5, 100.0) });

        let weights = root_weights(&ws);
        assert!(approx_eq(weights.iter().sum::<f32>(), 3.0));
        assert!(approx_eq(weights[0], 1.0));
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 271.5));
        assert!(approx_eq(rect_of_tab(&ws, "c").width, 328.5));
    }

    #[test]
    fn test_resize_clamps_at_min_item_size() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) });
        ws.pointer(PointerEvent::Down { position: at(400.0, 300.0) });

        assert_eq!(ws.pointer(PointerEvent::Move { position: at(795.0, 300.0) }), ResizeEffect::Clamped);
        assert_eq!(root_weights(&ws), vec![1.0, 1.0]);
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 400.0));

        // Exactly reaching the minimum is allowed.
        ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) });
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(790.0, 300.0) }), ResizeEffect::Resized);
        assert!(approx_eq(rect_of_tab(&ws, "b").width, 10.0));
    }

    #[test]
    fn test_pointer_away_from_boundary_is_ignored() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(200.0, 300.0) }), ResizeEffect::Ignored);
        assert_eq!(ws.pointer(PointerEvent::Down { position: at(200.0, 300.0) }), ResizeEffect::Ignored);
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) }), ResizeEffect::Hover);
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(420.0, 300.0) }), ResizeEffect::Unhover);
        assert_eq!(ws.resize_state(), ResizeState::Idle);
    }

    #[test]
    fn test_divider_indicator_follows_boundary() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        assert!(ws.divider().is_none());
        ws.pointer(PointerEvent::Move { position: at(399.0, 300.0) });
        let divider = ws.divider().unwrap();
        assert_eq!(divider.axis, Axis::Column);
        assert!(!divider.active);
        assert!(rect_approx_eq(&divider.rect, &Rect::new(398.5, 0.0, 3.0, 600.0)));

        ws.pointer(PointerEvent::Down { position: at(399.0, 300.0) });
        assert!(ws.divider().unwrap().active);
    }

    #[test]
    fn test_outer_container_captures_shared_point() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::container(Axis::Row, vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])]),
                NodeSpec::group(["c"]),
            ],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        let root = ws.root().unwrap().id();
        ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) });
        assert_eq!(ws.resize_state(), ResizeState::Hover { container: root, pair: 0 });

        // Only the row's own boundary is reachable away from the column edge.
        ws.pointer(PointerEvent::Move { position: at(200.0, 300.0) });
        match ws.resize_state() {
            ResizeState::Hover { container, pair } => {
                assert_ne!(container, root);
                assert_eq!(pair, 0);
            }
            other => panic!("expected hover, got {other:?}"),
        }

        ws.pointer(PointerEvent::Down { position: at(200.0, 300.0) });
        ws.pointer(PointerEvent::Move { position: at(200.0, 360.0) });
        assert!(approx_eq(rect_of_tab(&ws, "a").height, 360.0));
        assert_eq!(root_weights(&ws), vec![1.0, 1.0]);
    }

    // ──────────────────────────────────────────
    // Tabs & items
    // ──────────────────────────────────────────

    #[test]
    fn test_single_item_hides_tab_strip() {
        let (ws, group) = Workspace::with_group(["only"]).unwrap();
        let g = ws.group(group).unwrap();
        assert!(g.tabs().is_empty());
        assert!(!g.offers_add_tab());
    }

    #[test]
    fn test_select_item_switches_active() {
        let (mut ws, group) = Workspace::with_group(["a", "b", "c"]).unwrap();
        let seen = count_signals(&ws);
        assert!(ws.select_item(group, 2));
        assert_eq!(active_tab(&ws, group), "c");
        assert!(ws.select_item(group, 99));
        assert_eq!(active_tab(&ws, group), "c");
        let tabs = ws.group(group).unwrap().tabs();
        assert_eq!(tabs.iter().filter(|t| t.active).count(), 1);
        assert!(!ws.select_item(4242, 0));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_add_tab_like_last_clones_tab_id() {
        let (mut ws, group) = Workspace::with_group(["a", "b"]).unwrap();
        let added = ws.add_tab_like_last(group).unwrap();
        let g = ws.group(group).unwrap();
        assert_eq!(g.len(), 3);
        assert_eq!(g.active_item().unwrap().id(), added);
        assert_eq!(g.items()[2].tab_id(), "b");
    }

    #[test]
    fn test_fixed_tabs_refuse_add_tab() {
        let settings = LayoutSettings {
            fixed_tabs: true,
            ..LayoutSettings::default()
        };
        let mut ws = Workspace::build(&NodeSpec::group(["a", "b"]), settings).unwrap();
        let group = ws.root().unwrap().id();
        assert!(ws.add_tab_like_last(group).is_none());
        assert_eq!(ws.group(group).unwrap().len(), 2);
    }

    #[test]
    fn test_add_item_becomes_active() {
        let (mut ws, group) = Workspace::with_group(["a"]).unwrap();
        let mut spec = ItemSpec::new("b");
        spec.title = Some("Bee".into());
        let id = ws.add_item(group, &spec).unwrap();
        assert_eq!(ws.item(id).unwrap().title(), "Bee");
        assert_eq!(active_tab(&ws, group), "b");
        assert_eq!(ws.group(group).unwrap().tabs().len(), 2);
    }

    // ──────────────────────────────────────────
    // Removal & excision
    // ──────────────────────────────────────────

    #[test]
    fn test_removing_last_item_excises_group() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
        );
        let mut ws = solved(spec, 900.0, 600.0);
        let b = ws.find_item("b").unwrap();
        assert!(ws.remove_item(b).is_some());

        assert_eq!(ws.group_ids().len(), 2);
        let weights = root_weights(&ws);
        assert!(approx_eq(weights.iter().sum::<f32>(), 2.0));
        assert!(approx_eq(rect_of_tab(&ws, "a").width, 300.0));
        assert!(approx_eq(rect_of_tab(&ws, "c").width, 600.0));
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_removing_active_item_activates_neighbour() {
        let (mut ws, group) = Workspace::with_group(["a", "b", "c"]).unwrap();
        ws.select_item(group, 2);
        let c = ws.find_item("c").unwrap();
        ws.remove_item(c);
        assert_eq!(active_tab(&ws, group), "b");
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_excision_cascades_to_empty_containers() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::container(Axis::Row, vec![NodeSpec::group(["a"])]),
                NodeSpec::group(["b"]),
            ],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        let a = ws.find_item("a").unwrap();
        ws.remove_item(a);

        let root = ws.root().unwrap().as_container().unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.weights(), &[1.0]);
        assert!(rect_approx_eq(&rect_of_tab(&ws, "b"), &Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_removing_everything_empties_workspace() {
        let (mut ws, _) = Workspace::with_group(["only"]).unwrap();
        let item = ws.find_item("only").unwrap();
        ws.remove_item(item);
        assert!(ws.is_empty());
        assert!(ws.remove_item(item).is_none());
    }

    // ──────────────────────────────────────────
    // Drag & drop
    // ──────────────────────────────────────────

    #[test]
    fn test_unrelated_drag_is_ignored() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        assert!(!ws.begin_drag(&DragPayload::new("Files", "a")));
        assert!(!ws.begin_drag(&DragPayload::tab("nope")));
        assert!(ws.drag_over(at(200.0, 300.0)).is_none());
        assert_eq!(
            ws.drop_at(at(200.0, 300.0)),
            Err(LayoutError::InvalidDrop(DropRejection::NoSession))
        );
        assert_eq!(ws.group_ids().len(), 2);
    }

    #[test]
    fn test_drag_over_classifies_zones() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        assert!(ws.begin_drag(&DragPayload::tab("a")));
        // 400x600 group: edge strips are 50px.
        let b = group_of_tab(&ws, "b");
        let cases = [
            (at(600.0, 20.0), DropZone::Top),
            (at(600.0, 580.0), DropZone::Bottom),
            (at(420.0, 300.0), DropZone::Left),
            (at(780.0, 300.0), DropZone::Right),
            (at(600.0, 300.0), DropZone::Center),
            (at(410.0, 10.0), DropZone::Top),
        ];
        for (pos, zone) in cases {
            let preview = ws.drag_over(pos).unwrap();
            assert_eq!(preview.group, b);
            assert_eq!(preview.zone, zone, "at {pos:?}");
        }
        let top = ws.drag_over(at(600.0, 20.0)).unwrap();
        assert!(rect_approx_eq(&top.highlight, &Rect::new(400.0, 0.0, 400.0, 50.0)));

        ws.drag_leave();
        assert!(ws.drag_session().unwrap().hover.is_none());
        ws.end_drag();
        assert!(!ws.is_dragging());
    }

    #[test]
    fn test_center_drop_appends_as_active() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::Group {
                    items: vec![ItemSpec::new("a"), ItemSpec::new("b")],
                    active: Some(1),
                    edge_margin_fraction: None,
                    show_tabs: None,
                    fixed_tabs: None,
                },
                NodeSpec::group(["x", "y"]),
            ],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        let target = group_of_tab(&ws, "a");
        let source = group_of_tab(&ws, "x");
        let seen = count_signals(&ws);

        assert!(ws.begin_drag(&DragPayload::tab("x")));
        ws.drop_at(at(200.0, 300.0)).unwrap();

        let g = ws.group(target).unwrap();
        let tabs: Vec<&str> = g.items().iter().map(|i| i.tab_id()).collect();
        assert_eq!(tabs, vec!["a", "b", "x"]);
        assert_eq!(active_tab(&ws, target), "x");
        assert_eq!(active_tab(&ws, source), "y");
        assert_eq!(root_weights(&ws), vec![1.0, 1.0]);
        assert!(!ws.is_dragging());
        assert_eq!(*seen.borrow(), vec![Signal::Layout]);
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_center_drop_onto_own_group_is_rejected() {
        let (mut ws, _) = Workspace::with_group(["a", "b"]).unwrap();
        ws.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        ws.begin_drag(&DragPayload::tab("a"));
        assert_eq!(
            ws.drop_at(at(400.0, 300.0)),
            Err(LayoutError::InvalidDrop(DropRejection::SameGroup))
        );
        assert!(!ws.is_dragging());
    }

    #[test]
    fn test_top_drop_wraps_group_in_row() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a1", "a2"]), NodeSpec::group(["b"])],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("a2"));
        ws.drop_at(at(200.0, 10.0)).unwrap();

        assert!(rect_approx_eq(&rect_of_tab(&ws, "a2"), &Rect::new(0.0, 0.0, 400.0, 300.0)));
        assert!(rect_approx_eq(&rect_of_tab(&ws, "a1"), &Rect::new(0.0, 300.0, 400.0, 300.0)));
        assert_eq!(root_weights(&ws), vec![1.0, 1.0]);
        let first = &ws.root().unwrap().as_container().unwrap().children()[0];
        assert_eq!(first.as_container().unwrap().axis(), Axis::Row);
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_top_drop_in_row_halves_target() {
        let spec = NodeSpec::container(
            Axis::Row,
            vec![NodeSpec::group(["t"]), NodeSpec::group(["x", "y"])],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("x"));
        ws.drop_at(at(400.0, 5.0)).unwrap();

        // The target's 300px are shared by the new group and the target.
        assert!(approx_eq(rect_of_tab(&ws, "x").height, 150.0));
        assert!(approx_eq(rect_of_tab(&ws, "t").height, 150.0));
        assert!(approx_eq(rect_of_tab(&ws, "t").y, 150.0));
        assert!(approx_eq(rect_of_tab(&ws, "y").height, 300.0));
        assert!(approx_eq(root_weights(&ws).iter().sum::<f32>(), 3.0));
    }

    #[test]
    fn test_bottom_drop_inserts_after_target() {
        let spec = NodeSpec::container(
            Axis::Row,
            vec![NodeSpec::group(["t"]), NodeSpec::group(["x", "y"])],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("x"));
        ws.drop_at(at(400.0, 295.0)).unwrap();
        assert!(approx_eq(rect_of_tab(&ws, "t").y, 0.0));
        assert!(approx_eq(rect_of_tab(&ws, "x").y, 150.0));
    }

    #[test]
    fn test_left_drop_adds_column_beside_row() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::container(Axis::Row, vec![NodeSpec::group(["a"]), NodeSpec::group(["b"])]),
                NodeSpec::group(["c", "d"]),
            ],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("d"));
        ws.drop_at(at(10.0, 150.0)).unwrap();

        let root = ws.root().unwrap().as_container().unwrap();
        assert_eq!(root.children().len(), 3);
        let new_column = root.children()[0].as_container().unwrap();
        assert_eq!(new_column.axis(), Axis::Row);
        assert_eq!(new_column.children().len(), 1);

        assert!(rect_approx_eq(&rect_of_tab(&ws, "d"), &Rect::new(0.0, 0.0, 200.0, 600.0)));
        assert!(rect_approx_eq(&rect_of_tab(&ws, "a"), &Rect::new(200.0, 0.0, 200.0, 300.0)));
        assert!(approx_eq(rect_of_tab(&ws, "c").width, 400.0));
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_right_drop_without_column_wraps_root() {
        let (mut ws, original) = Workspace::with_group(["a", "b"]).unwrap();
        ws.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        ws.begin_drag(&DragPayload::tab("b"));
        ws.drop_at(at(790.0, 300.0)).unwrap();

        let root = ws.root().unwrap().as_container().unwrap();
        assert_eq!(root.axis(), Axis::Column);
        assert_eq!(root.weights(), &[1.0, 1.0]);
        assert!(rect_approx_eq(
            &ws.node(original).unwrap().rect().unwrap(),
            &Rect::new(0.0, 0.0, 400.0, 600.0)
        ));
        assert!(rect_approx_eq(&rect_of_tab(&ws, "b"), &Rect::new(400.0, 0.0, 400.0, 600.0)));
    }

    #[test]
    fn test_split_off_only_item_is_rejected() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        let before = ws.rects();
        ws.begin_drag(&DragPayload::tab("a"));
        assert_eq!(
            ws.drop_at(at(200.0, 5.0)),
            Err(LayoutError::InvalidDrop(DropRejection::LastItemOntoItself))
        );
        assert_eq!(ws.rects(), before);
    }

    #[test]
    fn test_drop_excises_emptied_source() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["a"]), NodeSpec::group(["b"]), NodeSpec::group(["c"])],
        );
        let mut ws = solved(spec, 900.0, 600.0);
        ws.begin_drag(&DragPayload::tab("b"));
        ws.drop_at(at(150.0, 300.0)).unwrap();

        assert_eq!(ws.group_ids().len(), 2);
        assert_eq!(group_of_tab(&ws, "a"), group_of_tab(&ws, "b"));
        assert!(approx_eq(root_weights(&ws).iter().sum::<f32>(), 2.0));
        assert!(ws.check_invariants().is_ok());
    }

    #[test]
    fn test_split_group_inherits_config() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![
                NodeSpec::Group {
                    items: vec![ItemSpec::new("a")],
                    active: None,
                    edge_margin_fraction: Some(0.25),
                    show_tabs: Some(true),
                    fixed_tabs: Some(true),
                },
                NodeSpec::group(["x", "y"]),
            ],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("x"));
        ws.drop_at(at(200.0, 5.0)).unwrap();

        let new_group = ws.group(group_of_tab(&ws, "x")).unwrap();
        assert!(new_group.config().show_tabs);
        assert!(new_group.config().fixed_tabs);
        assert_eq!(new_group.config().edge_margin_fraction, 0.25);
    }

    #[test]
    fn test_pointer_ignored_during_drag_session() {
        let mut ws = solved(two_columns(), 800.0, 600.0);
        ws.begin_drag(&DragPayload::tab("a"));
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) }), ResizeEffect::Ignored);
        ws.end_drag();
        assert_eq!(ws.pointer(PointerEvent::Move { position: at(400.0, 300.0) }), ResizeEffect::Hover);
    }

    #[test]
    fn test_drop_after_item_left_source_is_rejected() {
        let spec = NodeSpec::container(
            Axis::Column,
            vec![NodeSpec::group(["x", "y"]), NodeSpec::group(["z"])],
        );
        let mut ws = solved(spec, 800.0, 600.0);
        let x = ws.find_item("x").unwrap();
        let target = group_of_tab(&ws, "z");
        assert!(ws.begin_drag(&DragPayload::tab("x")));
        let source = ws.drag_session().unwrap().source_group;

        ws.move_item(x, target, DropZone::Center).unwrap();
        assert_eq!(
            ws.drop_at(at(200.0, 300.0)),
            Err(LayoutError::InvalidDrop(DropRejection::SourceChanged))
        );
        assert!(!ws.is_dragging());
        assert_eq!(ws.group_of(x), Some(target));
        assert_eq!(group_of_tab(&ws, "y"), source);
    }

    // ──────────────────────────────────────────
    // Signals
    // ──────────────────────────────────────────

    #[test]
    fn test_viewport_change_broadcasts_resize() {
        let mut ws = Workspace::build(&two_columns(), LayoutSettings::default()).unwrap();
        let seen = count_signals(&ws);
        ws.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        ws.set_viewport(Rect::new(0.0, 0.0, 1024.0, 768.0));
        assert_eq!(*seen.borrow(), vec![Signal::Resize, Signal::Resize]);
        assert_eq!(ws.bus().generation(), 2);
    }
}
