mod common;

use common::{line, RequestBuilder};
use hanzi_grader::protocol::GradeRequest;
use hanzi_grader::scorer::holistic::displacement_penalty;
use hanzi_grader::scorer::LevelScore;
use proptest::prelude::*;

prop_compose! {
    /// 十 with both evaluate strokes jittered, kept well inside the canvas.
    fn arb_shi()(
        h_start in (40.0f64..80.0, 100.0f64..140.0),
        h_end in (176.0f64..216.0, 100.0f64..140.0),
        v_start in (108.0f64..148.0, 30.0f64..60.0),
        v_end in (108.0f64..148.0, 190.0f64..226.0),
    ) -> GradeRequest {
        RequestBuilder::shi()
            .evaluate(vec![line(h_start, h_end), line(v_start, v_end)])
            .build()
    }
}

prop_compose! {
    /// 川 with each evaluate stroke moved sideways and tilted.
    fn arb_chuan()(
        shifts in prop::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 3),
    ) -> GradeRequest {
        let evaluate = common::chuan_lines()
            .iter()
            .zip(shifts)
            .map(|(l, (top, bottom))| {
                let first = l.list[0];
                let last = l.list[l.list.len() - 1];
                line((first.x + top, first.y), (last.x + bottom, last.y))
            })
            .collect();
        RequestBuilder::chuan().evaluate(evaluate).build()
    }
}

fn assert_level_within_weights(level: &LevelScore) {
    for r in level.results() {
        let amount = r.amount();
        assert!(amount >= 0.0 && amount <= r.full_score, "{}: {} of {}", r.metric, amount, r.full_score);
        assert!((0..=100).contains(&r.sub_score()), "{}: sub score {}", r.metric, r.sub_score());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_deductions_stay_within_weights(request in arb_shi()) {
        let outcome = common::grader().grade(&request).unwrap();
        let b = &outcome.breakdown;

        assert_level_within_weights(&b.character);
        assert_level_within_weights(&b.base);
        for s in &b.strokes {
            assert_level_within_weights(&s.level);
        }
        prop_assert!(outcome.score <= 100.0);
        prop_assert!(outcome.score >= 50.0, "score {}", outcome.score);
        prop_assert_eq!(outcome.score, b.total());

        let report = &outcome.report;
        for field in [
            report.center_of_gravity_score,
            report.font_size_score,
            report.fount_score,
            report.spacing_structure_score,
            report.stroke_length_score,
            report.struction_score,
        ] {
            prop_assert!((0..=100).contains(&field));
        }
    }

    #[test]
    fn prop_component_grades_are_bounded_and_repeatable(request in arb_chuan()) {
        let grader = common::grader();
        let first = grader.grade(&request).unwrap();
        let second = grader.grade(&request).unwrap();
        prop_assert_eq!(&first, &second);

        for s in &first.breakdown.structions {
            assert_level_within_weights(&s.level);
        }
        prop_assert!(first.breakdown.worst_struction.is_some());
        prop_assert!((0..=100).contains(&first.report.struction_score));
        prop_assert!(first.score <= 100.0);
    }

    #[test]
    fn prop_holistic_total_is_clamped(request in arb_shi()) {
        let score = common::grader().holistic(&request).unwrap();
        prop_assert!((30.0..=100.0).contains(&score.total), "total {}", score.total);
        prop_assert!((0.0..=1.0).contains(&score.overlap_raw));
        prop_assert!((0.0..=1.0).contains(&score.stroke_score));
    }

    #[test]
    fn prop_hull_overlap_ignores_translation(dx in -30i32..=30, dy in -20i32..=20) {
        let evaluate = common::shi_lines()
            .iter()
            .map(|l| common::shifted(l, dx as f64, dy as f64))
            .collect();
        let request = RequestBuilder::shi().evaluate(evaluate).build();
        let score = common::grader().holistic(&request).unwrap();
        prop_assert!((score.overlap_raw - 1.0).abs() < 0.05, "raw {}", score.overlap_raw);
        prop_assert!((score.overlap_resized - 1.0).abs() < 0.05, "resized {}", score.overlap_resized);
    }

    #[test]
    fn prop_displacement_penalty_grows_with_distance(a in 0.0f64..150.0, b in 0.0f64..150.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let p_near = displacement_penalty(near, 0.0, 100.0, 100.0);
        let p_far = displacement_penalty(far, 0.0, 100.0, 100.0);
        prop_assert!(p_near <= p_far + 1e-9, "{} -> {}, {} -> {}", near, p_near, far, p_far);
        prop_assert!(p_near >= 0.0);
    }
}
