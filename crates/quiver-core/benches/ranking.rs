//! Benchmarks for scoring and ranking.
//!
//! Run with: cargo bench -p quiver-core
//! Results are saved to target/criterion/

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quiver_core::action::{ActionFields, Runner};
use quiver_core::index::ActionStore;
use quiver_core::search::{ResultList, rank};

const APPS: [(&str, &str); 20] = [
    ("Firefox", "firefox"),
    ("Google Chrome", "google-chrome-stable"),
    ("Visual Studio Code", "code"),
    ("Terminal", "gnome-terminal"),
    ("Files", "nautilus"),
    ("Spotify", "spotify"),
    ("Discord", "discord"),
    ("Slack", "slack"),
    ("Thunderbird", "thunderbird"),
    ("GIMP", "gimp"),
    ("VLC Media Player", "vlc"),
    ("LibreOffice Writer", "libreoffice"),
    ("Inkscape", "inkscape"),
    ("Blender", "blender"),
    ("OBS Studio", "obs"),
    ("Telegram", "telegram-desktop"),
    ("Signal", "signal-desktop"),
    ("Zoom", "zoom"),
    ("Steam", "steam"),
    ("Lutris", "lutris"),
];

fn generate_store(count: usize) -> ActionStore {
    let mut store = ActionStore::new();
    for i in 0..count {
        let (name, exec) = APPS[i % APPS.len()];
        let key = format!("/usr/share/applications/{exec}-{i}.desktop");
        store.upsert(
            &key,
            ActionFields {
                display_name: format!("{name} {i}"),
                match_hint: exec.to_string(),
                icon_ref: exec.to_string(),
                source_time: 0,
                runner: Runner::RunCommand {
                    command: exec.to_string(),
                },
            },
        );
        if i % 7 == 0 {
            store.restore_usage(&key, &exec[..2], i as u64);
        }
    }
    store
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in [100, 1_000, 10_000] {
        let store = generate_store(size);
        group.throughput(Throughput::Elements(size as u64));

        for query in ["f", "fire", "term", "zzz"] {
            group.bench_with_input(BenchmarkId::new(query, size), &store, |b, store| {
                b.iter(|| rank(black_box(store), black_box(query)));
            });
        }
    }

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let store = generate_store(2_000);

    c.bench_function("type_query_2000", |b| {
        b.iter(|| {
            let mut list = ResultList::new();
            let mut query = String::new();
            for ch in "visual".chars() {
                query.push(ch);
                list.refilter(black_box(&store), &query);
            }
            list.len()
        });
    });
}

criterion_group!(benches, bench_rank, bench_typing);
criterion_main!(benches);
