//! Property tests for the planning arithmetic
//!
//! These tests verify that:
//! - every orientation gets at least one tile per row
//! - row counts cover the whole quantity
//! - rows are spread over canvases with at most one row of difference
//! - an L unit always carries an even number of garments

use gangsheet::layout::{
    plan_layout, plan_row_fit, BoundingBox, CanvasLimits, Dimension, Mode, Orientation,
};
use proptest::prelude::*;

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::B), Just(Mode::FB), Just(Mode::Pant)]
}

proptest! {
    #[test]
    fn plan_always_fits_one_per_row(
        width in 0.5f64..120.0,
        height in 0.5f64..120.0,
        gap in 0.0f64..2.0,
        canvas in 5.0f64..80.0,
        quantity in 1u32..500,
        mode in mode(),
    ) {
        let plan = plan_layout(Dimension::new(width, height), mode, gap, canvas, quantity).unwrap();
        prop_assert!(plan.vertical_per_row >= 1);
        prop_assert!(plan.horizontal_per_row >= 1);
        prop_assert!(plan.l_shape_per_row >= 1);
        prop_assert_eq!(plan.vertical_rows, quantity.div_ceil(plan.vertical_per_row));
        prop_assert_eq!(plan.horizontal_rows, quantity.div_ceil(plan.horizontal_per_row));
    }

    #[test]
    fn rows_cover_the_quantity(
        width in 0.5f64..60.0,
        height in 0.5f64..60.0,
        quantity in 1u32..500,
        mode in mode(),
    ) {
        let plan = plan_layout(Dimension::new(width, height), mode, 0.1, 63.25, quantity).unwrap();
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let capacity = plan.rows(orientation) * plan.per_row(orientation);
            prop_assert!(capacity >= quantity);
            prop_assert!(capacity - quantity < plan.per_row(orientation));
        }
    }

    #[test]
    fn l_shape_pairs_hold_an_even_count(quantity in 1u32..500) {
        let plan = plan_layout(Dimension::new(25.0, 25.0), Mode::FB, 0.1, 63.25, quantity).unwrap();
        prop_assert_eq!(plan.l_shape_pairs * 2, quantity + quantity % 2);
        prop_assert_eq!(Orientation::LShape.index_step(), 2);
    }

    #[test]
    fn only_front_back_interlocks(
        width in 0.5f64..30.0,
        height in 0.5f64..30.0,
        quantity in 1u32..50,
    ) {
        for mode in [Mode::B, Mode::Pant] {
            let plan = plan_layout(Dimension::new(width, height), mode, 0.1, 63.25, quantity).unwrap();
            prop_assert!(!plan.l_shape_feasible);
            prop_assert_ne!(plan.recommended, Orientation::LShape);
        }
    }

    #[test]
    fn rows_spread_evenly_over_canvases(
        width in 36.0f64..6000.0,
        height in 36.0f64..6000.0,
        quantity in 1u32..300,
        max_height in 720.0f64..20000.0,
    ) {
        let limits = CanvasLimits::from_inches(63.25, max_height / 72.0, 0.1);
        let unit = BoundingBox::from_origin(0.0, 0.0, width, height);
        let fit = plan_row_fit(&unit, quantity, &limits).unwrap();

        prop_assert!(fit.fit_per_row >= 1);
        prop_assert!(fit.canvases_needed >= 1);
        prop_assert!(fit.rows_needed * fit.fit_per_row >= quantity);

        let split: Vec<u32> = (0..fit.canvases_needed).map(|i| fit.rows_on_canvas(i)).collect();
        prop_assert_eq!(split.iter().sum::<u32>(), fit.rows_needed);
        let most = split.iter().copied().max().unwrap_or(0);
        let least = split.iter().copied().min().unwrap_or(0);
        prop_assert!(most - least <= 1);
        prop_assert_eq!(fit.rows_on_canvas(fit.canvases_needed), 0);
    }

    #[test]
    fn row_fit_prefers_the_shorter_stack(
        width in 36.0f64..4000.0,
        height in 36.0f64..4000.0,
        quantity in 3u32..200,
    ) {
        let limits = CanvasLimits::from_inches(63.25, 200.0, 0.1);
        let natural = plan_row_fit(&BoundingBox::from_origin(0.0, 0.0, width, height), quantity, &limits).unwrap();
        let turned = plan_row_fit(&BoundingBox::from_origin(0.0, 0.0, height, width), quantity, &limits).unwrap();
        // both views weigh the same two stacks
        prop_assert!((natural.total_height - turned.total_height).abs() < 1e-6);
    }
}
