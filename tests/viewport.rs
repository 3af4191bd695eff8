use nodecanvas::config::EditorConfig;
use nodecanvas::editor::Viewport;
use nodecanvas::model::Point;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn zoom_never_leaves_range() {
    let mut v = Viewport::default();
    let mut accepted = 0;
    for _ in 0..5 {
        if v.adjust_zoom(1.0) {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 4);
    assert!((v.zoom() - 1.2).abs() < 1e-9);

    for _ in 0..40 {
        v.adjust_zoom(-1.0);
        assert!(v.zoom() >= 0.3 && v.zoom() <= 1.2);
    }
    assert!((v.zoom() - 0.3).abs() < 1e-9);
    assert!(!v.adjust_zoom(-1.0));
}

#[test]
fn round_trip_for_every_zoom_and_pan() {
    let mut v = Viewport::from_config(&EditorConfig::default());
    v.set_origin(Point::new(35.0, -12.5));
    v.set_panning(true);
    v.accumulate_pan(-80.0, 41.0);
    v.set_panning(false);

    while v.adjust_zoom(-1.0) {}
    loop {
        for screen in [
            Point::new(0.0, 0.0),
            Point::new(512.25, 300.0),
            Point::new(-40.0, 1200.5),
        ] {
            let back = v.world_to_screen(v.screen_to_world(screen));
            assert!(close(back, screen), "zoom {}: {:?} != {:?}", v.zoom(), back, screen);
        }
        if !v.adjust_zoom(1.0) {
            break;
        }
    }
}

#[test]
fn pan_is_unscaled_and_gated() {
    let mut v = Viewport::default();
    v.adjust_zoom(-1.0);
    assert!(!v.accumulate_pan(10.0, 10.0));
    v.set_panning(true);
    assert!(v.accumulate_pan(10.0, -4.0));
    assert_eq!(v.pan(), Point::new(10.0, -4.0));
}

#[test]
fn custom_zoom_range() {
    let json = r#"{ "min_zoom": 0.5, "max_zoom": 2.0, "zoom_step": 0.5 }"#;
    let config = EditorConfig::from_json_str(json).unwrap();
    let mut v = Viewport::from_config(&config);
    assert!(v.adjust_zoom(1.0));
    assert!(v.adjust_zoom(1.0));
    assert!(!v.adjust_zoom(1.0));
    assert_eq!(v.zoom(), 2.0);
}
