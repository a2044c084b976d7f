use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_LEN: usize = 6;

const SEAT_ROWS: u32 = 30;
const SEAT_LETTERS: &[u8] = b"ABCDEF";

/// A 6-character alphanumeric booking reference (PNR).
pub fn booking_reference<R: Rng>(rng: &mut R) -> String {
    (0..REFERENCE_LEN)
        .map(|_| {
            *REFERENCE_ALPHABET
                .choose(rng)
                .unwrap_or(&b'A') as char
        })
        .collect()
}

/// One seat label per passenger, rows 1-30 by letters A-F. Uniqueness is
/// scoped to this booking only; two bookings on the same flight may carry
/// the same seat label.
pub fn assign_seats<R: Rng>(rng: &mut R, count: usize) -> Vec<String> {
    let mut taken = HashSet::with_capacity(count);
    let mut seats = Vec::with_capacity(count);
    while seats.len() < count {
        let row = rng.gen_range(1..=SEAT_ROWS);
        let letter = *SEAT_LETTERS.choose(rng).unwrap_or(&b'A') as char;
        let seat = format!("{row}{letter}");
        if taken.insert(seat.clone()) {
            seats.push(seat);
        }
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_reference_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let reference = booking_reference(&mut rng);
            assert_eq!(reference.len(), 6);
            assert!(reference
                .bytes()
                .all(|b| REFERENCE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_seats_are_unique_within_booking() {
        let mut rng = rand::thread_rng();
        let seats = assign_seats(&mut rng, 9);
        assert_eq!(seats.len(), 9);

        let distinct: HashSet<&String> = seats.iter().collect();
        assert_eq!(distinct.len(), 9);

        for seat in &seats {
            let (row, letter) = seat.split_at(seat.len() - 1);
            let row: u32 = row.parse().unwrap();
            assert!((1..=30).contains(&row));
            assert!("ABCDEF".contains(letter));
        }
    }
}
