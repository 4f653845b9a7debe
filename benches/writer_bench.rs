//! Benchmarks for sim-sqlite
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sim_sqlite::report::{split_units, PackedDate};
use sim_sqlite::{
    DictionaryEntry, OutputConfig, ReportingFrequency, SqlOutput, StoreType, TimeIndexEntry,
    TimestepType,
};

fn open_with_variables(variables: i32) -> SqlOutput {
    let mut output = SqlOutput::open(OutputConfig::in_memory()).unwrap();
    for id in 1..=variables {
        let name = format!("Variable {id}");
        output
            .create_report_variable_dictionary_record(&DictionaryEntry {
                id,
                store_type: StoreType::Averaged,
                index_group: "Zone",
                timestep_type: TimestepType::Zone,
                key_value: "ZONE ONE",
                name: &name,
                frequency: ReportingFrequency::TimeStep,
                schedule_name: None,
                units: "C",
            })
            .unwrap();
    }
    output
}

fn benchmark_timestep_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("timestep_rows");

    for variables in [10, 100] {
        group.throughput(Throughput::Elements(variables as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(variables),
            &variables,
            |b, &variables| {
                let mut output = open_with_variables(variables);
                output.begin().unwrap();
                let mut minute = 0.0;

                b.iter(|| {
                    minute = (minute + 15.0) % 60.0;
                    output
                        .create_time_index_record(
                            &TimeIndexEntry::new(ReportingFrequency::TimeStep, 1)
                                .date(1, 1)
                                .hour(1)
                                .minutes(minute, minute + 15.0),
                        )
                        .unwrap();
                    for id in 1..=variables {
                        output
                            .create_report_variable_data_record(
                                id,
                                black_box(21.5),
                                ReportingFrequency::TimeStep,
                                None,
                            )
                            .unwrap();
                    }
                });

                output.commit().unwrap();
            },
        );
    }

    group.finish();
}

fn benchmark_tabular_report(c: &mut Criterion) {
    let rows: Vec<String> = (1..=20).map(|i| format!("Zone {i}")).collect();
    let columns: Vec<String> = (1..=8).map(|i| format!("Load Component {i} [W]")).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|_| columns.iter().map(|_| "123.45".to_string()).collect())
        .collect();

    c.bench_function("tabular_report_160_cells", |b| {
        let mut output = SqlOutput::open(OutputConfig::in_memory()).unwrap();
        output.begin().unwrap();

        b.iter(|| {
            let cells = output
                .create_tabular_data_records(
                    &body,
                    &rows,
                    &columns,
                    "ZoneComponentLoadSummary",
                    "ZONE ONE",
                    "Estimated Cooling Peak Load Components",
                )
                .unwrap();
            black_box(cells);
        });

        output.commit().unwrap();
    });
}

fn benchmark_label_parsing(c: &mut Criterion) {
    c.bench_function("split_units", |b| {
        b.iter(|| split_units(black_box("Energy Per Conditioned Building Area [MJ/m2]")))
    });

    c.bench_function("packed_date_decode", |b| {
        b.iter(|| PackedDate::decode(black_box(7_151_400)).normalized())
    });
}

criterion_group!(
    benches,
    benchmark_timestep_rows,
    benchmark_tabular_report,
    benchmark_label_parsing
);
criterion_main!(benches);
