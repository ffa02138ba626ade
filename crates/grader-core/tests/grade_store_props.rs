use grader_core::{Grade, GradeStore, Progress};
use proptest::prelude::*;

fn grade() -> impl Strategy<Value = Grade> {
    prop_oneof![Just(Grade::Pass), Just(Grade::Fail)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn repeated_saves_keep_exactly_one_row_matching_last_call(
        calls in prop::collection::vec((grade(), "[a-z ,\"\n]{0,24}"), 1..6),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = GradeStore::new(dir.path().join("grades.csv"));

        let mut table = None;
        for (g, comment) in &calls {
            table = Some(store.save("trace_001", *g, comment).unwrap());
        }
        let table = table.unwrap();
        let (last_grade, last_comment) = calls.last().unwrap();

        prop_assert_eq!(table.len(), 1);
        let row = table.get("trace_001").unwrap();
        prop_assert_eq!(row.grade.as_str(), last_grade.as_str());
        prop_assert_eq!(&row.comment, last_comment);

        let reloaded = store.load().unwrap();
        prop_assert_eq!(reloaded, table);
    }

    #[test]
    fn progress_counts_are_consistent(
        grades in prop::collection::vec(
            prop_oneof![Just(""), Just("pass"), Just("fail"), Just("skip")],
            0..40,
        ),
    ) {
        let p = Progress::from_grades(grades.iter().copied());
        prop_assert!(p.passed + p.failed <= p.graded);
        prop_assert!(p.graded <= p.total);
        prop_assert_eq!(p.ungraded, p.total - p.graded);
        prop_assert_eq!(p.total, grades.len());

        if !grades.contains(&"skip") {
            prop_assert_eq!(p.passed + p.failed, p.graded);
        }
    }
}
