use super::*;

const CANVAS: Canvas = Canvas {
    width: 400,
    height: 300,
};

fn seed_layers(n: u64) -> (Vec<TextLayer>, u64) {
    let mut layers = Vec::new();
    for i in 0..n {
        layers.push(TextLayer::new(LayerId(i), CANVAS));
    }
    (layers, n)
}

#[test]
fn add_allocates_sequential_ids_and_centers() {
    let mut next_id = 0;
    let layers = apply(&[], &LayerCommand::Add, CANVAS, &mut next_id).unwrap();
    let layers = apply(&layers, &LayerCommand::Add, CANVAS, &mut next_id).unwrap();

    assert_eq!(next_id, 2);
    assert_eq!(layers[0].id, LayerId(0));
    assert_eq!(layers[1].id, LayerId(1));
    assert_eq!(layers[1].x, 200.0);
    assert_eq!(layers[1].y, 150.0);
    assert_eq!(layers[1].size_px, 100.0);
}

#[test]
fn delete_removes_only_the_identified_layer() {
    let (layers, mut next_id) = seed_layers(3);
    let layers = apply(
        &layers,
        &LayerCommand::Delete(LayerId(1)),
        CANVAS,
        &mut next_id,
    )
    .unwrap();
    let ids: Vec<u64> = layers.iter().map(|l| l.id.0).collect();
    assert_eq!(ids, vec![0, 2]);
}

#[test]
fn unknown_layer_id_is_an_error() {
    let (layers, mut next_id) = seed_layers(1);
    let err = apply(
        &layers,
        &LayerCommand::Delete(LayerId(9)),
        CANVAS,
        &mut next_id,
    );
    assert!(err.is_err());
}

#[test]
fn duplicate_clones_under_fresh_id_with_offset() {
    let (mut layers, mut next_id) = seed_layers(1);
    layers[0].text = "hello".to_string();
    let layers = apply(
        &layers,
        &LayerCommand::Duplicate(LayerId(0)),
        CANVAS,
        &mut next_id,
    )
    .unwrap();

    assert_eq!(layers.len(), 2);
    let copy = &layers[1];
    assert_eq!(copy.id, LayerId(1));
    assert_eq!(copy.text, "hello");
    assert_eq!(copy.x, layers[0].x + 20.0);
    assert_eq!(copy.y, layers[0].y + 20.0);
}

#[test]
fn rotate_wraps_modulo_360() {
    let (mut layers, mut next_id) = seed_layers(1);
    layers[0].rotation_deg = 350.0;
    let layers = apply(
        &layers,
        &LayerCommand::Rotate {
            id: LayerId(0),
            delta_deg: 20.0,
        },
        CANVAS,
        &mut next_id,
    )
    .unwrap();
    assert_eq!(layers[0].rotation_deg, 10.0);

    let layers = apply(
        &layers,
        &LayerCommand::Rotate {
            id: LayerId(0),
            delta_deg: -30.0,
        },
        CANVAS,
        &mut next_id,
    )
    .unwrap();
    assert_eq!(layers[0].rotation_deg, 340.0);
}

#[test]
fn reorder_moves_layer_and_clamps_destination() {
    let (layers, mut next_id) = seed_layers(3);
    let layers = apply(
        &layers,
        &LayerCommand::Reorder {
            id: LayerId(0),
            to_index: 99,
        },
        CANVAS,
        &mut next_id,
    )
    .unwrap();
    let ids: Vec<u64> = layers.iter().map(|l| l.id.0).collect();
    assert_eq!(ids, vec![1, 2, 0]);
}

#[test]
fn clear_empties_the_sequence() {
    let (layers, mut next_id) = seed_layers(2);
    let layers = apply(&layers, &LayerCommand::Clear, CANVAS, &mut next_id).unwrap();
    assert!(layers.is_empty());
}

fn edit(layers: &[TextLayer], edit: LayerEdit) -> Vec<TextLayer> {
    let mut next_id = 100;
    apply(
        layers,
        &LayerCommand::Edit {
            id: LayerId(0),
            edit,
        },
        CANVAS,
        &mut next_id,
    )
    .unwrap()
}

#[test]
fn edits_clamp_into_documented_ranges() {
    let (layers, _) = seed_layers(1);

    let out = edit(
        &layers,
        LayerEdit::Skew {
            x_deg: 90.0,
            y_deg: -90.0,
        },
    );
    assert_eq!(out[0].skew_x_deg, 45.0);
    assert_eq!(out[0].skew_y_deg, -45.0);

    let out = edit(&layers, LayerEdit::LetterSpacing(120.0));
    assert_eq!(out[0].letter_spacing_px, 50.0);
    let out = edit(&layers, LayerEdit::LetterSpacing(-20.0));
    assert_eq!(out[0].letter_spacing_px, -10.0);

    let out = edit(&layers, LayerEdit::Curve(400.0));
    assert_eq!(out[0].curve_deg, 360.0);

    let out = edit(&layers, LayerEdit::Opacity(1.5));
    assert_eq!(out[0].opacity, 1.0);

    let out = edit(&layers, LayerEdit::Rotation(370.0));
    assert_eq!(out[0].rotation_deg, 10.0);

    let out = edit(
        &layers,
        LayerEdit::Extrusion(ExtrusionStyle {
            depth_px: -3.0,
            color: Rgba8::BLACK,
            angle_deg: 45.0,
        }),
    );
    assert_eq!(out[0].extrusion.depth_px, 0.0);
}

#[test]
fn gradient_toggle_retains_both_fills() {
    let (layers, _) = seed_layers(1);
    let custom = GradientStyle {
        start: Rgba8::opaque(255, 0, 0),
        end: Rgba8::opaque(0, 0, 255),
        angle_deg: 90.0,
    };
    let out = edit(&layers, LayerEdit::Gradient(custom));
    let out = edit(&out, LayerEdit::UseGradient(true));
    let out = edit(&out, LayerEdit::UseGradient(false));
    assert_eq!(out[0].gradient, custom);
    assert_eq!(out[0].color, Rgba8::WHITE);
}

#[test]
fn pro_gating_flags_the_expected_edits() {
    assert!(LayerEdit::UseGradient(true).requires_pro());
    assert!(!LayerEdit::UseGradient(false).requires_pro());
    assert!(LayerEdit::Curve(45.0).requires_pro());
    assert!(
        LayerEdit::Skew {
            x_deg: 1.0,
            y_deg: 0.0
        }
        .requires_pro()
    );
    assert!(LayerEdit::LetterSpacing(2.0).requires_pro());
    assert!(
        LayerEdit::Extrusion(ExtrusionStyle::default()).requires_pro()
    );
    assert!(!LayerEdit::Bold(true).requires_pro());
    assert!(!LayerEdit::Text("x".to_string()).requires_pro());

    assert!(AdjustmentEdit::Vignette(10.0).requires_pro());
    assert!(AdjustmentEdit::Noise(10.0).requires_pro());
    assert!(AdjustmentEdit::Sharpen(10.0).requires_pro());
    assert!(AdjustmentEdit::Temperature(10.0).requires_pro());
    assert!(!AdjustmentEdit::Hue(10.0).requires_pro());
    assert!(!AdjustmentEdit::Exposure(10.0).requires_pro());
}

#[test]
fn adjustment_edits_clamp_strengths() {
    let mut s = LayerSettings::default();
    AdjustmentEdit::Vignette(150.0).apply_to(&mut s);
    assert_eq!(s.vignette, 100.0);
    AdjustmentEdit::Noise(-5.0).apply_to(&mut s);
    assert_eq!(s.noise, 0.0);
    AdjustmentEdit::Scale(-50.0).apply_to(&mut s);
    assert_eq!(s.scale_pct, 0.0);
}

#[test]
fn commands_survive_serde_round_trip() {
    let cmd = LayerCommand::Edit {
        id: LayerId(3),
        edit: LayerEdit::Shadow(ShadowStyle {
            color: Rgba8::BLACK,
            blur_px: 4.0,
            offset_x: 2.0,
            offset_y: -2.0,
        }),
    };
    let json = serde_json::to_string(&cmd).unwrap();
    let back: LayerCommand = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cmd);
}
