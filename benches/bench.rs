// Criterion benchmarks for Cafe Picks

use cafe_picks::core::{
    distance::haversine_distance,
    picks::build_selection_prompt,
    ranking::rank_places,
};
use cafe_picks::models::{Coordinate, LatLng, LocalizedText, OpeningHours, Preference, PriceLevel, RawPlace};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_place(id: usize, lat: f64, lng: f64) -> RawPlace {
    RawPlace {
        id: Some(format!("place-{}", id)),
        display_name: Some(LocalizedText {
            text: Some(format!("Cafe {}", id)),
            language_code: Some("en".to_string()),
        }),
        formatted_address: Some(format!("{} Mission St, San Francisco", id)),
        location: Some(LatLng {
            latitude: Some(lat),
            longitude: Some(lng),
        }),
        rating: Some(3.5 + (id % 15) as f64 / 10.0),
        user_rating_count: Some(50 + id as u32 * 7),
        current_opening_hours: Some(OpeningHours { open_now: Some(id % 3 != 0) }),
        price_level: Some(if id % 2 == 0 { PriceLevel::Inexpensive } else { PriceLevel::Moderate }),
    }
}

fn create_places(count: usize) -> Vec<RawPlace> {
    (0..count)
        .map(|i| {
            let offset = (i as f64 * 0.37).sin() * 0.03;
            create_place(i, 37.7749 + offset, -122.4194 - offset / 2.0)
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(37.7749),
                black_box(-122.4194),
                black_box(37.7799),
                black_box(-122.4094),
            )
        });
    });
}

fn bench_rank_places(c: &mut Criterion) {
    let user = Coordinate::new(37.7749, -122.4194).unwrap();
    let mut group = c.benchmark_group("rank_places");

    for size in [20, 200, 2000] {
        let places = create_places(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &places, |b, places| {
            b.iter(|| rank_places(black_box(user), black_box(places)));
        });
    }

    group.finish();
}

fn bench_selection_prompt(c: &mut Criterion) {
    let user = Coordinate::new(37.7749, -122.4194).unwrap();
    let cafes = rank_places(user, &create_places(20));

    c.bench_function("build_selection_prompt", |b| {
        b.iter(|| build_selection_prompt(black_box(&cafes), Preference::Study));
    });
}

criterion_group!(benches, bench_haversine_distance, bench_rank_places, bench_selection_prompt);
criterion_main!(benches);
