//! Benchmark suite for hotelql's text processing stages.
//!
//! Benchmarks cover:
//! - Prompt assembly (question → prompt)
//! - SQL extraction (raw model output → statement)
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hotelql::extract::extract_sql;
use hotelql::prompt::build_prompt;

// ---------------------------------------------------------------------------
// Model outputs organized by shape
// ---------------------------------------------------------------------------

const BARE_STATEMENT: &str = "SELECT hotel_type, cancel_rate FROM view_cancel_rates";

const FENCED_STATEMENT: &str = "```sql\n\
    SELECT meal, avg_adr FROM view_meal_plan_adr WHERE hotel_type = 'City Hotel';\n\
    ```";

const FENCED_WITH_COMMENTARY: &str = "Here is the query you asked for:\n\n\
    ```sql\n\
    SELECT market_segment, revenue FROM view_revenue_segments ORDER BY revenue DESC;\n\
    ```\n\n\
    This uses the revenue view so no join is needed. Let me know if you want\n\
    the raw bookings breakdown instead:\n\n\
    ```sql\n\
    SELECT m.market_segment, SUM(b.adr) FROM bookings b\n\
    JOIN market_segments m ON m.market_segment_id = b.market_segment_id\n\
    GROUP BY m.market_segment;\n\
    ```";

const TRAILING_PROSE: &str = "SELECT arrival_date_month, total_bookings \
    FROM view_monthly_occupancy WHERE hotel_type = 'Resort Hotel'; \
    The month column is the spelled-out month name, not a number.";

const LONG_COMPLETION: &str = "```sql\n\
    WITH repeat_guests AS (\n\
        SELECT c.customer_id, c.country\n\
        FROM customers c\n\
        WHERE c.is_repeated_guest = 1\n\
    )\n\
    SELECT h.hotel_type, r.country, COUNT(*) AS stays,\n\
           AVG(b.stays_in_week_nights + b.stays_in_weekend_nights) AS avg_nights\n\
    FROM bookings b\n\
    JOIN repeat_guests r ON r.customer_id = b.customer_id\n\
    JOIN hotels h ON h.hotel_id = b.hotel_id\n\
    GROUP BY h.hotel_type, r.country\n\
    ORDER BY stays DESC;\n\
    ```";

// ---------------------------------------------------------------------------
// Benchmark groups
// ---------------------------------------------------------------------------

fn bench_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt");

    let questions = [
        ("short", "cancellation rate by hotel"),
        (
            "long",
            "for repeated guests only, what is the average number of nights per \
             stay broken down by hotel type, country and market segment, sorted \
             by the number of stays",
        ),
    ];

    for (name, question) in &questions {
        group.bench_with_input(BenchmarkId::new("build", name), question, |b, q| {
            b.iter(|| build_prompt(black_box(q)));
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    let cases = [
        ("bare", BARE_STATEMENT),
        ("fenced", FENCED_STATEMENT),
        ("fenced_commentary", FENCED_WITH_COMMENTARY),
        ("trailing_prose", TRAILING_PROSE),
        ("long_completion", LONG_COMPLETION),
    ];

    for (name, raw) in &cases {
        group.bench_with_input(BenchmarkId::new("extract", name), raw, |b, raw| {
            b.iter(|| extract_sql(black_box(raw)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_prompt, bench_extraction);
criterion_main!(benches);
