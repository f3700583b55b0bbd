use gf_shamir::{decode, FieldContext, Polynomial, Share, SharingError};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

fn evaluations(message: &Polynomial, n: usize) -> Vec<Share> {
    message
        .field()
        .range(1, n as u64 + 1)
        .into_iter()
        .map(|x| {
            let y = message.evaluate(&x);
            Share::new(x, y)
        })
        .collect()
}

const P: u64 = 7919;

/// Adds a nonzero offset to the y-value of `count` distinct points.
fn corrupt(field: &FieldContext, points: &mut [Share], count: usize, rng: &mut StdRng) {
    for i in sample(rng, points.len(), count).into_iter() {
        let offset = field.element(rng.gen_range(1..P));
        points[i].y += &offset;
    }
}

proptest! {
    #[test]
    fn corrects_up_to_e_errors(
        k in 1usize..6,
        e in 0usize..4,
        errors_raw in any::<usize>(),
        surplus in 0usize..3,
        seed in any::<u64>(),
    ) {
        let field = FieldContext::new(P).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let message = Polynomial::new(
            &field,
            (0..k).map(|_| field.random_element(&mut rng)).collect(),
        );

        let n = k + 2 * e + surplus;
        let mut points = evaluations(&message, n);
        corrupt(&field, &mut points, errors_raw % (e + 1), &mut rng);

        let decoded = decode(&points, k, e, &field).expect("within correction capacity");
        prop_assert_eq!(decoded, message);
    }
}

#[test]
fn degree_two_message_with_one_corruption() {
    let field = FieldContext::new(P).unwrap();
    let message = Polynomial::from_u64s(&field, &[1234, 166, 94]);
    let mut points = evaluations(&message, 5);
    points[1].y = field.element(42u32);

    let decoded = decode(&points, 3, 1, &field).unwrap();
    assert_eq!(decoded, message);
    assert_eq!(decoded.degree(), Some(2));
}

#[test]
fn degree_two_message_with_two_corruptions_fails() {
    let field = FieldContext::new(P).unwrap();
    let message = Polynomial::from_u64s(&field, &[5, 3, 2]);
    let mut points = evaluations(&message, 5);
    points[0].y += &field.one();
    points[1].y += &field.one();

    assert!(matches!(
        decode(&points, 3, 1, &field),
        Err(SharingError::DecodeError(_))
    ));
}

#[test]
fn fewer_than_k_plus_2e_points_is_insufficient() {
    let field = FieldContext::new(P).unwrap();
    let message = Polynomial::from_u64s(&field, &[5, 3, 2]);
    let points = evaluations(&message, 6);

    assert_eq!(
        decode(&points, 3, 2, &field).unwrap_err(),
        SharingError::InsufficientData {
            required: 7,
            available: 6
        }
    );
}
