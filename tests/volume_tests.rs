/// Integration tests for the occupancy counter invariant: after any
/// sequence of writes, every per-axis counter matches a brute-force
/// count of the non-empty cells in its slab
use cubemesh::{Region, Volume};
use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

type TestVolume = Volume<u16, 8, 6, 7>;

fn brute_force_check(volume: &TestVolume) {
    let mut x_counts = [0u32; 8];
    let mut y_counts = [0u32; 6];
    let mut z_counts = [0u32; 7];

    for y in 0..6 {
        for z in 0..7 {
            for x in 0..8 {
                if volume.get(x, y, z) != 0 {
                    x_counts[x] += 1;
                    y_counts[y] += 1;
                    z_counts[z] += 1;
                }
            }
        }
    }

    for (x, &count) in x_counts.iter().enumerate() {
        assert_eq!(
            volume.is_layer_x_empty(x),
            count == 0,
            "x slab {} emptiness",
            x
        );
    }
    for (y, &count) in y_counts.iter().enumerate() {
        assert_eq!(
            volume.is_layer_y_empty(y),
            count == 0,
            "y slab {} emptiness",
            y
        );
    }
    for (z, &count) in z_counts.iter().enumerate() {
        assert_eq!(
            volume.is_layer_z_empty(z),
            count == 0,
            "z slab {} emptiness",
            z
        );
    }

    let filled_x = x_counts.iter().filter(|&&n| n > 0).count();
    let filled_y = y_counts.iter().filter(|&&n| n > 0).count();
    let filled_z = z_counts.iter().filter(|&&n| n > 0).count();
    assert_eq!(volume.filled_layer_x_count(), filled_x);
    assert_eq!(volume.filled_layer_y_count(), filled_y);
    assert_eq!(volume.filled_layer_z_count(), filled_z);
}

#[test]
fn test_counters_track_random_write_sequences() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let mut volume = TestVolume::new(IVec3::ZERO);

    for step in 0..2000 {
        let x = rng.gen_range(0..8);
        let y = rng.gen_range(0..6);
        let z = rng.gen_range(0..7);
        // Half the writes clear, so slabs transition both ways.
        let voxel = if rng.gen_bool(0.5) {
            0
        } else {
            rng.gen_range(1..5u16)
        };
        volume.set(x, y, z, voxel);

        if step % 97 == 0 {
            brute_force_check(&volume);
        }
    }

    brute_force_check(&volume);
}

#[test]
fn test_counters_track_overlapping_fills() {
    let mut volume = TestVolume::new(IVec3::ZERO);

    volume.fill_region(&Region::new(0, 0, 0, 8, 2, 7), 1);
    brute_force_check(&volume);

    // Overwrite part of the slab with another class (no counter change)
    // and clear a strip through both (decrements).
    volume.fill_region(&Region::new(2, 0, 2, 4, 2, 3), 2);
    brute_force_check(&volume);

    volume.fill_region(&Region::new(0, 0, 3, 8, 6, 1), 0);
    brute_force_check(&volume);

    volume.fill_region(&Region::new(0, 0, 0, 8, 6, 7), 0);
    brute_force_check(&volume);
    for y in 0..6 {
        assert!(volume.is_layer_y_empty(y));
    }
}
