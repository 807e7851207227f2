use super::*;
use proptest::prelude::*;
use std::cmp::Ordering;

fn p(s: &str) -> TurnPath {
    s.parse().unwrap()
}

fn turn() -> impl Strategy<Value = Turn> {
    (-4i64..=4, any::<bool>()).prop_map(|(d, b1)| {
        Turn::new(d, if b1 { Singularity::B1 } else { Singularity::B0 })
    })
}

fn raw_turns() -> impl Strategy<Value = Vec<Turn>> {
    prop::collection::vec(turn(), 0..10)
}

fn path() -> impl Strategy<Value = TurnPath> {
    raw_turns().prop_map(TurnPath::new)
}

fn small_path() -> impl Strategy<Value = TurnPath> {
    prop::collection::vec(turn(), 0..5).prop_map(TurnPath::new)
}

#[test]
fn cancelling_pair_is_identity() {
    let q = TurnPath::new([Turn::b0(1), Turn::b0(-1)]);
    assert!(q.is_empty());
    assert_eq!(q.len(), 0);
    assert_eq!(q, TurnPath::empty());
}

#[test]
fn weight_of_three_turn_path() {
    let q = TurnPath::new([Turn::b0(2), Turn::b1(3), Turn::b0(-2)]);
    assert_eq!(q.len(), 3);
    assert_eq!(q.weight(), BaseValues::new(4, 3));
    assert_eq!(q.total_weight(), 7);
    assert_eq!(q.degree(), BaseValues::new(0, 3));
}

#[test]
fn push_merges_and_cancels_at_the_seam() {
    let q = TurnPath::new([Turn::b0(2), Turn::b1(3), Turn::b1(-1), Turn::b0(0)]);
    assert_eq!(q, p("B0:2 B1:2"));
    let r = q.appended(Turn::b1(-2));
    assert_eq!(r, p("B0:2"));
    // value semantics: q is untouched
    assert_eq!(q.len(), 2);
}

#[test]
fn pow_single_turn_scales_degree() {
    let g = TurnPath::from_turn(Turn::b0(2));
    assert_eq!(g.pow(3), p("B0:6"));
    assert_eq!(g.pow(-2), p("B0:-4"));
    assert_eq!(g.pow(0), TurnPath::empty());
}

#[test]
fn pow_odd_exponent_on_longer_word() {
    let q = p("B0:1 B1:1");
    assert_eq!(q.pow(3), p("B0:1 B1:1 B0:1 B1:1 B0:1 B1:1"));
    // conjugate-shaped word: p^n = a b^n a^-1
    let c = p("B0:1 B1:2 B0:-1");
    assert_eq!(c.pow(5), p("B0:1 B1:10 B0:-1"));
}

#[test]
fn pow_reaches_the_extreme_exponents() {
    let g = TurnPath::from_turn(Turn::b0(1));
    assert_eq!(g.pow(i64::MIN).turns(), &[Turn::b0(i64::MIN)]);
    assert_eq!(g.pow(i64::MAX).turns(), &[Turn::b0(i64::MAX)]);
    assert_eq!(
        p("B0:1 B1:1 B0:-1").pow(i64::MIN).turns(),
        &[Turn::b0(1), Turn::b1(i64::MIN), Turn::b0(-1)]
    );
    assert_eq!(
        p("B0:1 B1:-1 B0:-1").pow(i64::MIN + 1).turns(),
        &[Turn::b0(1), Turn::b1(i64::MAX), Turn::b0(-1)]
    );
}

#[test]
#[should_panic(expected = "turn degree overflow")]
fn pow_panics_when_degree_leaves_i64() {
    TurnPath::from_turn(Turn::b0(3)).pow(i64::MAX);
}

#[test]
#[should_panic(expected = "turn degree overflow")]
fn turn_pow_panics_on_overflow() {
    Turn::b1(2).pow(i64::MAX);
}

#[test]
#[should_panic(expected = "turn degree overflow")]
fn merging_turns_panics_on_overflow() {
    p("B1:1 B0:1").appended(Turn::b0(i64::MAX));
}

#[test]
fn inverse_and_transpose_differ() {
    let q = p("B0:2 B1:-3");
    assert_eq!(q.inverse(), p("B1:3 B0:-2"));
    assert_eq!(q.transpose(), p("B0:-2 B1:3"));
}

#[test]
fn split_prefix_suffix_clamp() {
    let q = p("B0:1 B1:2 B0:3");
    let (a, b) = q.split(1);
    assert_eq!(a, p("B0:1"));
    assert_eq!(b, p("B1:2 B0:3"));
    assert_eq!(q.prefix(10), q);
    assert_eq!(q.suffix(10), q);
    assert_eq!(q.suffix(0), TurnPath::empty());
}

#[test]
fn rotation_reduces_at_the_seam() {
    let q = p("B0:1 B1:2 B0:3");
    assert_eq!(q.rotated_left_by(1), p("B1:2 B0:4"));
    assert_eq!(q.rotated_left_by(0), q);
    assert_eq!(q.rotated_left_by(3), q);
}

#[test]
fn compare_turn_keys() {
    assert_eq!(compare_turn(&Turn::b1(1), &Turn::b0(-2)), Ordering::Less);
    assert_eq!(compare_turn(&Turn::b0(-2), &Turn::b1(2)), Ordering::Less);
    assert_eq!(compare_turn(&Turn::b1(3), &Turn::b1(-3)), Ordering::Less);
    assert_eq!(compare_turn(&Turn::b1(-3), &Turn::b1(3)), Ordering::Greater);
    assert_eq!(compare_turn(&Turn::b0(4), &Turn::b0(4)), Ordering::Equal);
}

#[test]
fn monoidal_components_split_on_repeated_sign() {
    let q = p("B0:1 B1:-1 B0:1 B1:1 B0:-1");
    let comps = q.monoidal_components();
    assert_eq!(comps, vec![p("B0:1 B1:-1 B0:1"), p("B1:1 B0:-1")]);
    assert_eq!(q.monoidal_component_count(), 2);

    let alternating = p("B0:2 B1:-1 B0:3 B1:-5");
    assert_eq!(alternating.monoidal_components(), vec![alternating.clone()]);

    assert!(TurnPath::empty().monoidal_components().is_empty());
}

#[test]
fn path_order_prefers_short_then_few_components() {
    let short = p("B0:1 B1:-1");
    let long = p("B0:1 B1:-1 B0:1");
    assert_eq!(path_order(&short, &long), Some(Ordering::Less));
    assert!(path_less_than(&short, &long));
    assert!(!path_less_than(&long, &short));

    let one_comp = p("B0:1 B1:-1 B0:1 B1:-1");
    let two_comp = p("B0:1 B1:1 B0:-1 B1:1");
    assert_eq!(path_order(&one_comp, &two_comp), Some(Ordering::Less));

    let other = p("B0:2 B1:-1 B0:1 B1:-1");
    assert_eq!(path_order(&one_comp, &other), None);
    assert!(!path_less_than(&one_comp, &other));
    assert!(!path_less_than(&other, &one_comp));
    assert_eq!(path_order(&other, &other), Some(Ordering::Equal));
}

#[test]
fn symmetric_paths_match_a_rotated_transpose() {
    assert!(p("B0:1 B1:1 B0:-1 B1:-1").is_symmetric());
    assert!(!p("B0:1 B1:-1").is_symmetric());
    assert!(!p("B0:2 B1:1 B0:-1 B1:-1").is_symmetric());
}

#[test]
fn canonical_rotation_picks_least_rotation() {
    let q = p("B1:2 B0:1 B1:-1 B0:-1");
    assert_eq!(q.canonical_rotation(), p("B0:1 B1:-1 B0:-1 B1:2"));
    assert_eq!(
        q.rotated_left_by(2).canonical_rotation(),
        q.canonical_rotation()
    );
}

#[test]
fn display_and_parse() {
    let q = TurnPath::new([Turn::b0(2), Turn::b1(-3)]);
    assert_eq!(q.to_string(), "[B0:2, B1:-3]");
    assert_eq!(q.to_string().parse::<TurnPath>().unwrap(), q);
    assert_eq!(p("B0:1, B0:-1"), TurnPath::empty());
    assert_eq!(p("[]"), TurnPath::empty());
    assert!(matches!(
        "B2:1".parse::<TurnPath>(),
        Err(ParseTurnPathError::BadSingularity(_))
    ));
    assert!(matches!(
        "B0:x".parse::<TurnPath>(),
        Err(ParseTurnPathError::BadDegree(_))
    ));
    assert!(matches!(
        "B0".parse::<TurnPath>(),
        Err(ParseTurnPathError::BadToken(_))
    ));
}

#[test]
fn serde_rejects_unreduced_input() {
    let q = p("B0:2 B1:-3");
    let json = serde_json::to_string(&q).unwrap();
    assert_eq!(
        json,
        r#"[{"degree":2,"singularity":"B0"},{"degree":-3,"singularity":"B1"}]"#
    );
    let back: TurnPath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, q);

    let merged = r#"[{"degree":1,"singularity":"B0"},{"degree":2,"singularity":"B0"}]"#;
    assert!(serde_json::from_str::<TurnPath>(merged).is_err());
    let zero = r#"[{"degree":0,"singularity":"B1"}]"#;
    assert!(serde_json::from_str::<TurnPath>(zero).is_err());
    assert_eq!(
        TurnPath::try_from(vec![Turn::b1(1), Turn::b1(1)]),
        Err(TurnPathError::UnreducedPair {
            index: 0,
            singularity: Singularity::B1
        })
    );
}

proptest! {
    #[test]
    fn prop_construction_is_reduced(turns in raw_turns()) {
        let q = TurnPath::new(turns);
        prop_assert!(check_reduced(q.turns()).is_ok());
    }

    #[test]
    fn prop_associative(a in path(), b in path(), c in path()) {
        prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
    }

    #[test]
    fn prop_identity_and_inverse(a in path()) {
        prop_assert_eq!(&a * &TurnPath::empty(), a.clone());
        prop_assert_eq!(&TurnPath::empty() * &a, a.clone());
        prop_assert_eq!(&a * &a.inverse(), TurnPath::empty());
        prop_assert_eq!(&a.inverse() * &a, TurnPath::empty());
    }

    #[test]
    fn prop_inverse_of_product(a in path(), b in path()) {
        prop_assert_eq!((&a * &b).inverse(), &b.inverse() * &a.inverse());
    }

    #[test]
    fn prop_power_law(q in small_path(), a in -6i64..=6, b in -6i64..=6) {
        prop_assert_eq!(&q.pow(a) * &q.pow(b), q.pow(a + b));
        prop_assert_eq!(q.pow(0), TurnPath::empty());
    }

    #[test]
    fn prop_degree_is_homomorphism(a in path(), b in path()) {
        let d = (&a * &b).degree();
        prop_assert_eq!(d.b0, a.degree().b0 + b.degree().b0);
        prop_assert_eq!(d.b1, a.degree().b1 + b.degree().b1);
    }

    #[test]
    fn prop_rotation(q in path(), k in 0usize..12) {
        let k = k.min(q.len());
        prop_assert_eq!(q.rotated_left_by(k), &q.suffix(q.len() - k) * &q.prefix(k));
        prop_assert_eq!(q.rotated_left_by(0), q.clone());
    }

    #[test]
    fn prop_conjugation_witness(q in path(), k in 0usize..12) {
        let k = k.min(q.len());
        let g = q.conjugate_for_left_rotation(k);
        prop_assert_eq!(&(&g.inverse() * &q) * &g, q.rotated_left_by(k));
    }

    #[test]
    fn prop_components_concatenate_back(q in path()) {
        let joined = q
            .monoidal_components()
            .iter()
            .fold(TurnPath::empty(), |acc, c| &acc * c);
        prop_assert_eq!(joined, q.clone());
        prop_assert_eq!(q.monoidal_components().len(), q.monoidal_component_count());
    }

    #[test]
    fn prop_text_round_trip(q in path()) {
        prop_assert_eq!(q.to_string().parse::<TurnPath>().unwrap(), q);
    }
}
