use parallax::Overrides;

#[derive(Clone, Debug, PartialEq, Overrides)]
struct CardStyle {
    width: f32,
    title: String,
    visible: bool,
}

fn base() -> CardStyle {
    CardStyle {
        width: 320.0,
        title: "Pricing".into(),
        visible: true,
    }
}

#[test]
fn test_empty_overrides_leave_base_untouched() {
    let overrides = CardStyleOverrides::new();
    assert!(overrides.is_empty());
    assert_eq!(overrides.apply_to(&base()), base());
}

#[test]
fn test_setters_apply_only_set_fields() {
    let overrides = CardStyleOverrides::new().title("Plans".to_string());
    assert!(!overrides.is_empty());

    let style = overrides.apply_to(&base());
    assert_eq!(style.title, "Plans");
    assert_eq!(style.width, 320.0);
    assert!(style.visible);
}

#[test]
fn test_merge_prefers_other() {
    let page = CardStyleOverrides::new().width(400.0).visible(false);
    let call_site = CardStyleOverrides::new().width(480.0);

    let merged = page.merge(&call_site);
    assert_eq!(merged.width, Some(480.0));
    assert_eq!(merged.visible, Some(false));
    assert_eq!(merged.title, None);
}

#[test]
fn test_from_full_value_sets_every_field() {
    let overrides = CardStyleOverrides::from(base());
    let other = CardStyle {
        width: 1.0,
        title: String::new(),
        visible: false,
    };
    assert_eq!(overrides.apply_to(&other), base());
}
