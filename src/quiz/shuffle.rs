use rand::Rng;

/// Uniform in-place permutation (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffle a copy of `options` and return it with the new position of the
/// correct option.
///
/// The correct option is tracked by value. If several options share its
/// text, the first matching position wins.
pub fn shuffle_options<R: Rng + ?Sized>(
    options: &[String],
    correct_index: usize,
    rng: &mut R,
) -> (Vec<String>, usize) {
    let correct = options.get(correct_index);

    let mut shuffled = options.to_vec();
    shuffle(&mut shuffled, rng);
    let remapped = correct
        .and_then(|correct| shuffled.iter().position(|option| option == correct))
        .unwrap_or(correct_index);

    (shuffled, remapped)
}
