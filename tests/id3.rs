//! End-to-end behaviour of ID3 induction and inference on small categorical tables.

use approx::assert_relative_eq;
use nalgebra::DVector;

use rusty_id3::data::dataset::{Attribute, Dataset, Schema, Value};
use rusty_id3::data::loader::{read_from, LoadOptions};
use rusty_id3::metrics::confusion::ClassificationMetrics;
use rusty_id3::trees::classifier::{train, Id3Classifier};
use rusty_id3::trees::gain::{table_entropy, GainAccumulator};
use rusty_id3::trees::node::{TreeNode, TreeVisitor, VisitContext};
use rusty_id3::trees::render::render_tree;
use rusty_id3::Id3Error;

const PLAY_TENNIS: &str = "\
outlook,humidity,decision
Sunny,High,Don't Play
Sunny,High,Don't Play
Overcast,High,Play
Rain,High,Play
Rain,Normal,Play
Rain,Normal,Don't Play
Overcast,Normal,Play
Sunny,High,Don't Play
Sunny,Normal,Play
Rain,Normal,Play
Sunny,Normal,Play
Overcast,High,Play
Overcast,Normal,Play
Rain,High,Don't Play
";

const FULL_TENNIS: &str = "\
outlook,temperature,humidity,wind,play
Sunny,Hot,High,Weak,No
Sunny,Hot,High,Strong,No
Overcast,Hot,High,Weak,Yes
Rain,Mild,High,Weak,Yes
Rain,Cool,Normal,Weak,Yes
Rain,Cool,Normal,Strong,No
Overcast,Cool,Normal,Strong,Yes
Sunny,Mild,High,Weak,No
Sunny,Cool,Normal,Weak,Yes
Rain,Mild,Normal,Weak,Yes
Sunny,Mild,Normal,Strong,Yes
Overcast,Mild,High,Strong,Yes
Overcast,Hot,Normal,Weak,Yes
Rain,Mild,High,Strong,No
";

fn load(table: &str) -> Dataset {
    read_from(table.as_bytes(), &LoadOptions::default()).unwrap()
}

fn record(dataset: &Dataset, labels: &[Option<&str>]) -> DVector<Value> {
    let values = labels
        .iter()
        .enumerate()
        .map(|(i, label)| label.and_then(|l| dataset.schema().feature(i).index_of(l)))
        .collect();
    DVector::from_vec(values)
}

#[derive(Default)]
struct LeafDepths(Vec<usize>);

impl TreeVisitor for LeafDepths {
    fn visit_internal(&mut self, _: &VisitContext, _: usize, _: usize) {}

    fn visit_leaf(&mut self, context: &VisitContext, _: usize, _: usize) {
        self.0.push(context.depth);
    }
}

#[test]
fn test_tennis_splits_on_outlook_first() {
    let dataset = load(PLAY_TENNIS);
    let classifier = train(&dataset, 2).unwrap();
    let schema = dataset.schema();

    let TreeNode::Internal {
        attribute, children, ..
    } = classifier.tree().unwrap()
    else {
        panic!("expected a split at the root");
    };
    assert_eq!(schema.feature(*attribute).name(), "outlook");

    let overcast = schema.feature(0).index_of("Overcast").unwrap();
    let play = schema.class().index_of("Play").unwrap();
    assert_eq!(children[&overcast], TreeNode::leaf(play, 4));
}

#[test]
fn test_pure_table_is_a_single_leaf() {
    let dataset = load("windy,play\nyes,go\nno,go\nyes,go\n");
    for confidence in 0..=2 {
        let classifier = train(&dataset, confidence).unwrap();
        let tree = classifier.tree().unwrap();
        assert_eq!(*tree, TreeNode::leaf(0, 3));
        assert_eq!(tree.num_nodes(), 1);
    }
}

#[test]
fn test_unpruned_grows_until_pure_or_exhausted() {
    let dataset = load(PLAY_TENNIS);
    let classifier = train(&dataset, 2).unwrap();
    let tree = classifier.tree().unwrap();

    let mut depths = LeafDepths::default();
    tree.walk(&mut depths);
    // overcast is pure at depth 1, every other branch uses up both attributes
    assert_eq!(depths.0, vec![2, 2, 1, 2, 2]);
}

#[test]
fn test_insignificant_split_becomes_majority_leaf() {
    let dataset = load(PLAY_TENNIS);
    let play = dataset.schema().class().index_of("Play").unwrap();

    for confidence in [0, 1] {
        let classifier = train(&dataset, confidence).unwrap();
        assert_eq!(*classifier.tree().unwrap(), TreeNode::leaf(play, 14));
    }
}

#[test]
fn test_significant_split_is_kept() {
    let schema = Schema::new(
        vec![Attribute::new("switch", ["off", "on"])],
        Attribute::new("light", ["dark", "lit"]),
    );
    let rows: Vec<Vec<Value>> = (0..20).map(|i| vec![Some(i % 2)]).collect();
    let classes: Vec<usize> = (0..20).map(|i| i % 2).collect();
    let dataset = Dataset::from_rows(schema, &rows, &classes).unwrap();

    for confidence in [0, 1] {
        let classifier = train(&dataset, confidence).unwrap();
        let tree = classifier.tree().unwrap();
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.child(1), Some(&TreeNode::leaf(1, 10)));
    }
}

#[test]
fn test_training_is_deterministic() {
    let dataset = load(FULL_TENNIS);
    let first = train(&dataset, 2).unwrap();
    let second = train(&dataset, 2).unwrap();
    assert_eq!(first.tree(), second.tree());
    assert_eq!(
        render_tree(first.tree().unwrap(), dataset.schema()),
        render_tree(second.tree().unwrap(), dataset.schema())
    );
}

#[test]
fn test_unpruned_tree_fits_its_training_records() {
    let dataset = load(FULL_TENNIS);
    let classifier = train(&dataset, 2).unwrap();

    for row in 0..dataset.nrows() {
        let predicted = classifier.classify(&dataset.record(row)).unwrap();
        assert_eq!(predicted, dataset.class_of(row), "record {}", row);
    }
    assert_relative_eq!(classifier.evaluate(&dataset).unwrap(), 1.0);

    let predictions = classifier.predict_dataset(&dataset).unwrap();
    let recall = classifier.recall_per_class(&dataset.y, &predictions).unwrap();
    assert_eq!(recall, vec![Some(1.0), Some(1.0)]);
}

#[test]
fn test_full_tennis_tree() {
    let dataset = load(FULL_TENNIS);
    let classifier = train(&dataset, 2).unwrap();
    let expected = "\
outlook (14)
├── Sunny ~> humidity (5)
│   ├── High >> No (3)
│   └── Normal >> Yes (2)
├── Overcast >> Yes (4)
└── Rain ~> wind (5)
    ├── Weak >> Yes (3)
    └── Strong >> No (2)
";
    assert_eq!(render_tree(classifier.tree().unwrap(), dataset.schema()), expected);
}

#[test]
fn test_missing_value_uses_class_specific_substitute() {
    let dataset = load(FULL_TENNIS);
    let classifier = train(&dataset, 2).unwrap();
    let no = dataset.schema().class().index_of("No").unwrap();
    let yes = dataset.schema().class().index_of("Yes").unwrap();

    let missing = record(&dataset, &[Some("Sunny"), Some("Hot"), None, Some("Weak")]);
    let high = record(&dataset, &[Some("Sunny"), Some("Hot"), Some("High"), Some("Weak")]);
    let normal = record(&dataset, &[Some("Sunny"), Some("Hot"), Some("Normal"), Some("Weak")]);

    // humidity is mostly High among No records and mostly Normal among Yes records
    assert_eq!(
        classifier.classify_with_class(&missing, Some(no)).unwrap(),
        classifier.classify_with_class(&high, Some(no)).unwrap()
    );
    assert_eq!(
        classifier.classify_with_class(&missing, Some(yes)).unwrap(),
        classifier.classify_with_class(&normal, Some(yes)).unwrap()
    );
}

#[test]
fn test_missing_training_value_is_imputed() {
    let complete = load(FULL_TENNIS);
    let with_gap = load(&FULL_TENNIS.replace("Sunny,Cool,Normal,Weak,Yes", "Sunny,Cool,?,Weak,Yes"));
    assert_eq!(with_gap.value(8, 2), None);

    let expected = train(&complete, 2).unwrap();
    let imputed = train(&with_gap, 2).unwrap();
    assert_eq!(expected.tree(), imputed.tree());
}

#[test]
fn test_unseen_value_falls_back_to_most_frequent() {
    let dataset = load(FULL_TENNIS);
    let classifier = train(&dataset, 2).unwrap();

    // an index outside the outlook domain has no branch. Without a class the
    // substitute is Overcast, the strongest per-class mode (4 Yes records)
    let mut unseen = record(&dataset, &[Some("Sunny"), Some("Hot"), Some("High"), Some("Weak")]);
    unseen[0] = Some(7);
    let yes = dataset.schema().class().index_of("Yes").unwrap();
    assert_eq!(classifier.classify(&unseen).unwrap(), yes);

    // with the class known, the No records' favourite (Sunny) is used
    let no = dataset.schema().class().index_of("No").unwrap();
    assert_eq!(classifier.classify_with_class(&unseen, Some(no)).unwrap(), no);
}

#[test]
fn test_unknown_branch_is_an_error() {
    let schema = Schema::new(
        vec![
            Attribute::new("a", ["a1", "a2"]),
            Attribute::new("b", ["b1", "b2", "b3"]),
        ],
        Attribute::new("class", ["x", "y"]),
    );
    let mut rows = Vec::new();
    let mut classes = Vec::new();
    for _ in 0..4 {
        rows.push(vec![Some(0), Some(0)]);
        classes.push(0);
        rows.push(vec![Some(0), Some(1)]);
        classes.push(1);
    }
    for class in [0, 1, 0, 1, 0, 1] {
        rows.push(vec![Some(1), Some(2)]);
        classes.push(class);
    }
    let dataset = Dataset::from_rows(schema, &rows, &classes).unwrap();
    let classifier = train(&dataset, 2).unwrap();

    // b3 only ever co-occurs with a2, while a1 is the most frequent value of a
    let record = DVector::from_vec(vec![Some(0), Some(2)]);
    let result = classifier.classify_with_class(&record, Some(0));
    assert!(matches!(
        result,
        Err(Id3Error::UnknownBranch { ref attribute, value: 0 }) if attribute == "a"
    ));
}

#[test]
fn test_invalid_confidence_level() {
    let dataset = load(PLAY_TENNIS);
    assert!(matches!(
        train(&dataset, 3),
        Err(Id3Error::InvalidConfidenceLevel { level: 3 })
    ));
    assert!(Id3Classifier::with_params(Some(9), None).is_err());
}

#[test]
fn test_entropy_properties() {
    let pure = load("a,c\nx,p\ny,p\n");
    assert_relative_eq!(table_entropy(&pure), 0.0);

    let uniform = load("a,c\nx,p\ny,q\nx,r\ny,s\n");
    assert_relative_eq!(table_entropy(&uniform), 2.0, epsilon = 1e-12);

    let skewed = load("a,c\nx,p\ny,q\nx,p\n");
    assert!(table_entropy(&skewed) > 0.0);
    assert!(table_entropy(&skewed) < 1.0);
}

#[test]
fn test_gain_is_bounded_by_table_entropy() {
    let dataset = load(FULL_TENNIS);
    let baseline = table_entropy(&dataset);

    for &feature in dataset.in_scope() {
        let mut accumulator = GainAccumulator::new(dataset.schema().num_classes());
        for row in 0..dataset.nrows() {
            if let Some(value) = dataset.value(row, feature) {
                accumulator.add_observation(value, dataset.class_of(row));
            }
        }
        let gain = accumulator.gain(baseline);
        assert!(gain >= -1e-12, "{} has negative gain", feature);
        assert!(gain <= baseline + 1e-12, "{} exceeds the baseline", feature);
    }
}

#[test]
fn test_holdout_validation() {
    let dataset = load(FULL_TENNIS);
    let (train_set, validation) = dataset.holdout_every_nth(10).unwrap();
    assert_eq!(train_set.nrows(), 12);
    assert_eq!(validation.nrows(), 2);
    assert_eq!(validation.record(1), dataset.record(10));

    let classifier = train(&train_set, 2).unwrap();
    let accuracy = classifier.evaluate(&validation).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}
