use proptest::{collection::vec, prelude::*, sample::Index};
use recell::{RelayCell, ValueCell};
use std::sync::{Arc, Mutex};

proptest! {
    #[test]
    fn early_subscriber_observes_the_full_history(
        initial: i32,
        updates in vec(any::<i32>(), 0..32),
    ) {
        let cell = ValueCell::new(initial);
        let seen: Arc<Mutex<Vec<i32>>> = Default::default();

        cell.subscribe({
            let seen = seen.clone();
            move |val| seen.lock().unwrap().push(*val)
        });

        for &val in &updates {
            cell.update(val);
        }

        let mut expected = vec![initial];
        expected.extend(&updates);
        prop_assert_eq!(expected, seen.lock().unwrap().clone());
    }

    #[test]
    fn late_subscriber_observes_the_suffix(
        initial: i32,
        updates in vec(any::<i32>(), 0..32),
        split: Index,
    ) {
        let k = split.index(updates.len() + 1);
        let cell = ValueCell::new(initial);

        for &val in &updates[..k] {
            cell.update(val);
        }

        let seen: Arc<Mutex<Vec<i32>>> = Default::default();
        cell.subscribe({
            let seen = seen.clone();
            move |val| seen.lock().unwrap().push(*val)
        });

        for &val in &updates[k..] {
            cell.update(val);
        }

        let current_at_k = if k == 0 { initial } else { updates[k - 1] };
        let mut expected = vec![current_at_k];
        expected.extend(&updates[k..]);
        prop_assert_eq!(expected, seen.lock().unwrap().clone());
    }

    #[test]
    fn relay_read_tracks_its_upstream(
        initial: i32,
        updates in vec(any::<i32>(), 0..32),
    ) {
        let cell = ValueCell::new(initial);
        let relay = RelayCell::wrap(cell.clone());

        prop_assert_eq!(cell.read(), relay.read());
        for &val in &updates {
            cell.update(val);
            prop_assert_eq!(cell.read(), relay.read());
        }
    }
}
