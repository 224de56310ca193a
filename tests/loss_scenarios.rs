use ndarray::{Array1, Array3};
use scattering_loss::{
    compute_gap, covariance_loss, scattering_mse_loss, CoeffDescriptor, DescriptorFilter,
    LossError, MomentCategory, MomentCollection, MomentDescriptor,
};

fn descriptor(records: &[(MomentCategory, u8)]) -> MomentDescriptor {
    records
        .iter()
        .map(|&(c_type, q)| CoeffDescriptor { c_type, q })
        .collect()
}

/// Single-batch, single-component collection from per-coefficient values.
fn collection(values: &[f32], records: &[(MomentCategory, u8)]) -> MomentCollection {
    let array = Array3::from_shape_vec((1, values.len(), 1), values.to_vec())
        .expect("shape matches");
    MomentCollection::from_arrays(array, descriptor(records))
}

#[test]
fn absent_input_yields_negated_target_gap() {
    let target = collection(
        &[0.3, -0.4, 0.2],
        &[
            (MomentCategory::Mean, 1),
            (MomentCategory::Spectrum, 2),
            (MomentCategory::Envelope, 2),
        ],
    );
    let (gap, _) = compute_gap(None, &target, None).unwrap();
    assert_eq!(gap[[0, 0]], -0.3);
    assert_eq!(gap[[0, 1]], 0.4);
    assert_eq!(gap[[0, 2]], -0.2);
}

#[test]
fn shape_mismatch_is_reported() {
    let target = collection(
        &[0.5, 0.5],
        &[(MomentCategory::Mean, 1), (MomentCategory::Spectrum, 2)],
    );
    let input = collection(&[0.5], &[(MomentCategory::Mean, 1)]);
    let err = compute_gap(Some(&input), &target, None).unwrap_err();
    assert!(matches!(err, LossError::ShapeMismatch { .. }));
}

#[test]
fn sample_weight_length_is_validated() {
    let target = collection(&[0.5], &[(MomentCategory::Mean, 1)]);
    let weights = Array1::from_vec(vec![1.0, 2.0]);
    let err = compute_gap(None, &target, Some(&weights)).unwrap_err();
    assert!(matches!(err, LossError::ShapeMismatch { .. }));
}

#[test]
fn sample_weights_scale_whole_rows() {
    let records = [(MomentCategory::Spectrum, 2), (MomentCategory::Spectrum, 2)];
    let target = MomentCollection::from_arrays(
        Array3::from_shape_vec((2, 2, 1), vec![0.5, 0.5, 0.5, 0.5]).expect("shape matches"),
        descriptor(&records),
    );
    let input = MomentCollection::from_arrays(
        Array3::from_shape_vec((2, 2, 1), vec![1.5, 2.5, 3.5, 4.5]).expect("shape matches"),
        descriptor(&records),
    );
    let weights = Array1::from_vec(vec![0.5, 2.0]);
    let (gap, _) = compute_gap(Some(&input), &target, Some(&weights)).unwrap();
    assert!((gap[[0, 0]] - 0.5).abs() < 1e-6);
    assert!((gap[[0, 1]] - 1.0).abs() < 1e-6);
    assert!((gap[[1, 0]] - 6.0).abs() < 1e-6);
    assert!((gap[[1, 1]] - 8.0).abs() < 1e-6);
}

#[test]
fn mean_gap_pct_is_a_ratio_of_means() {
    let records = [(MomentCategory::Spectrum, 2), (MomentCategory::Spectrum, 2)];
    let target = collection(&[0.1, 1.0], &records);
    let input = collection(&[0.12, 1.1], &records);
    let (_, diagnostics) = compute_gap(Some(&input), &target, None).unwrap();

    // mean(|gap|) / mean(|target|) = 0.06 / 0.55
    let mean_gap_pct = diagnostics.mean_gap_pct[&MomentCategory::Spectrum];
    assert!((mean_gap_pct - 0.06 / 0.55).abs() < 1e-6);
    // ...which is not the mean of per-element ratios (0.2 + 0.1) / 2
    assert!((mean_gap_pct - 0.15).abs() > 1e-3);

    // max_gap_pct, in contrast, is the max of per-element ratios
    let max_gap_pct = diagnostics.max_gap_pct[&MomentCategory::Spectrum];
    assert!((max_gap_pct - 0.2).abs() < 1e-6);

    let max_gap = diagnostics.max_gap[&MomentCategory::Spectrum];
    assert!((max_gap - 0.1).abs() < 1e-6);
}

#[test]
fn negligible_coefficients_are_masked_from_diagnostics() {
    // Category Sparsity has one surviving (0.02) and one negligible (0.005)
    // coefficient; category Envelope one well-sized coefficient. The model
    // matches the target exactly, so everything reports zero.
    let records = [
        (MomentCategory::Sparsity, 2),
        (MomentCategory::Sparsity, 2),
        (MomentCategory::Envelope, 2),
    ];
    let target = collection(&[0.02, 0.005, 0.5], &records);
    let input = target.clone();
    let output = scattering_mse_loss(Some(&input), &target, None, None).unwrap();

    assert_eq!(output.loss, 0.0);
    for c_type in [MomentCategory::Sparsity, MomentCategory::Envelope] {
        assert_eq!(output.diagnostics.max_gap[&c_type], 0.0);
        assert_eq!(output.diagnostics.mean_gap_pct[&c_type], 0.0);
        assert_eq!(output.diagnostics.max_gap_pct[&c_type], 0.0);
    }
}

#[test]
fn fully_negligible_category_reports_exact_zeros() {
    let records = [(MomentCategory::Mean, 1), (MomentCategory::Mean, 1)];
    let target = collection(&[0.005, 0.008], &records);
    let input = collection(&[1.0, 1.0], &records);
    let output = scattering_mse_loss(Some(&input), &target, None, None).unwrap();

    // The gap is far from zero, but every coefficient of the category is
    // negligible, so the diagnostics degenerate to exact zeros.
    assert!(output.loss > 0.9);
    assert_eq!(output.diagnostics.max_gap[&MomentCategory::Mean], 0.0);
    assert_eq!(output.diagnostics.mean_gap_pct[&MomentCategory::Mean], 0.0);
    assert_eq!(output.diagnostics.max_gap_pct[&MomentCategory::Mean], 0.0);
}

#[test]
fn uniform_coefficient_weights_recover_the_mean() {
    let records = [
        (MomentCategory::Mean, 1),
        (MomentCategory::Spectrum, 2),
        (MomentCategory::Envelope, 2),
    ];
    let input = MomentCollection::from_seed(1, 4, 1, descriptor(&records));
    let target = MomentCollection::from_seed(2, 4, 1, descriptor(&records));

    let unweighted = scattering_mse_loss(Some(&input), &target, None, None).unwrap();
    let total = (4 * records.len()) as f32;
    let weights = Array1::from_elem(records.len(), 1.0 / total);
    let weighted = scattering_mse_loss(Some(&input), &target, None, Some(&weights)).unwrap();

    assert!((weighted.loss - unweighted.loss).abs() < 1e-6);
}

#[test]
fn coefficient_weights_are_a_sum_not_a_mean() {
    let records = [(MomentCategory::Spectrum, 2), (MomentCategory::Spectrum, 2)];
    let target = collection(&[1.0, 2.0], &records);
    let weights = Array1::from_vec(vec![2.0, 3.0]);
    // Zero-estimate baseline: gap² = [1, 4], so loss = 2·1 + 3·4.
    let output = scattering_mse_loss(None, &target, None, Some(&weights)).unwrap();
    assert!((output.loss - 14.0).abs() < 1e-6);
}

#[test]
fn coefficient_weight_length_is_validated() {
    let target = collection(&[1.0, 2.0], &[(MomentCategory::Mean, 1), (MomentCategory::Mean, 1)]);
    let weights = Array1::from_vec(vec![1.0]);
    let err = scattering_mse_loss(None, &target, None, Some(&weights)).unwrap_err();
    assert!(matches!(err, LossError::ShapeMismatch { .. }));
}

#[test]
fn covariance_loss_requires_a_model_estimate() {
    let target = collection(&[1.0], &[(MomentCategory::Mean, 1)]);
    let err = covariance_loss(None, &target).unwrap_err();
    assert!(matches!(err, LossError::MissingInput { .. }));
}

#[test]
fn covariance_gap_vanishes_when_input_matches_target() {
    let records = [
        (MomentCategory::Mean, 1),
        (MomentCategory::Spectrum, 2),
        (MomentCategory::Sparsity, 0),
    ];
    let target = collection(&[0.8, 0.3, 0.6], &records);
    let mut input = target.clone();
    // The q = 0 coefficient sits outside both order paths: perturbing it
    // must not contribute anything.
    input.values[[0, 2, 0]] = 42.0;

    let output = covariance_loss(Some(&input), &target).unwrap();
    assert_eq!(output.loss, 0.0);
    assert_eq!(output.diagnostics.max_gap[&MomentCategory::Mean], 0.0);
    assert_eq!(output.diagnostics.max_gap[&MomentCategory::Spectrum], 0.0);
    assert_eq!(output.diagnostics.max_gap[&MomentCategory::Sparsity], 0.0);
    // Relative diagnostics are not tracked by this variant.
    assert!(output.diagnostics.mean_gap_pct.is_empty());
    assert!(output.diagnostics.max_gap_pct.is_empty());
}

#[test]
fn covariance_first_order_scales_difference_by_target() {
    let target = collection(&[1.0], &[(MomentCategory::Mean, 1)]);
    let input = collection(&[1.1], &[(MomentCategory::Mean, 1)]);
    let output = covariance_loss(Some(&input), &target).unwrap();
    // gap = 1.0 · (1.1 − 1.0) = 0.1, loss = 0.1² = 0.01
    assert!((output.loss - 0.01).abs() < 1e-6);
    assert!((output.diagnostics.max_gap[&MomentCategory::Mean] - 0.1).abs() < 1e-6);
}

#[test]
fn covariance_second_order_is_a_plain_difference() {
    let target = collection(&[0.5], &[(MomentCategory::Envelope, 2)]);
    let input = collection(&[0.7], &[(MomentCategory::Envelope, 2)]);
    let output = covariance_loss(Some(&input), &target).unwrap();
    assert!((output.loss - 0.04).abs() < 1e-6);
}

#[test]
fn select_and_mask_agree_on_descriptor_filters() {
    let records = [
        (MomentCategory::PhaseEnvelope, 1),
        (MomentCategory::PhaseEnvelope, 2),
        (MomentCategory::Envelope, 2),
    ];
    let target = collection(&[0.1, 0.2, 0.3], &records);
    let mask = target.mask(&[
        DescriptorFilter::CType(MomentCategory::PhaseEnvelope),
        DescriptorFilter::Q(2),
    ]);
    let selected = target.select(&mask);
    assert_eq!(selected.dim(), (1, 1, 1));
    assert!((selected[[0, 0, 0]] - 0.2).abs() < 1e-6);
}
