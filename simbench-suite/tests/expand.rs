// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use simbench_suite::{BenchmarkConfig, BenchmarkSection, PerClass};

fn two_class_section() -> BenchmarkSection {
    BenchmarkSection {
        name: "013".to_owned(),
        classes: Some(2),
        packet_size: Some(PerClass::Vector(vec![12, 88])),
        injection_process: Some(PerClass::Scalar("{sm,bernoulli}".to_owned())),
        injection_rate: Some(PerClass::Vector(vec![0.05, 0.005])),
        ..Default::default()
    }
}

#[test]
fn vector_fields_expand_to_class_count() {
    let bm = BenchmarkConfig::from_section(two_class_section()).unwrap();
    assert_eq!(bm.classes, 2);
    assert_eq!(bm.class_specs.len(), 2);
    assert_eq!(bm.class_specs[0].packet_size, Some(12));
    assert_eq!(bm.class_specs[1].packet_size, Some(88));
    assert_eq!(bm.class_specs[0].injection.stages[0].name, "sm");
    assert_eq!(bm.class_specs[1].injection.stages[0].name, "bernoulli");
    assert_eq!(bm.class_specs[1].injection_rate, Some(0.005));
}

#[test]
fn scalar_fields_replicate() {
    let bm = BenchmarkConfig::from_section(BenchmarkSection {
        name: "011".to_owned(),
        classes: Some(2),
        injection_process: Some(PerClass::Scalar("bernoulli".to_owned())),
        injection_rate: Some(PerClass::Vector(vec![0.1, 0.2])),
        use_read_write: Some(PerClass::Vector(vec![0, 1])),
        write_fraction: Some(PerClass::Scalar(0.3)),
        ..Default::default()
    })
    .unwrap();
    // The one pipeline and the scalar write fraction apply to both
    // classes; the vectors stay per class.
    assert_eq!(bm.class_specs[0].injection, bm.class_specs[1].injection);
    assert_eq!(bm.class_specs[0].write_fraction, Some(0.3));
    assert_eq!(bm.class_specs[1].write_fraction, Some(0.3));
    assert_eq!(bm.class_specs[0].use_read_write, Some(false));
    assert_eq!(bm.class_specs[1].use_read_write, Some(true));
}

#[test]
fn singleton_pipeline_list_broadcasts() {
    let bm = BenchmarkConfig::from_section(BenchmarkSection {
        name: "012".to_owned(),
        classes: Some(2),
        injection_process: Some(PerClass::Scalar(
            "{component(random(bernoulli))}".to_owned(),
        )),
        injection_rate: Some(PerClass::Vector(vec![0.1, 0.2])),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(bm.class_specs[0].injection, bm.class_specs[1].injection);
    assert_eq!(bm.class_specs[0].injection.stages[0].name, "random");
}

#[test]
fn expansion_always_yields_class_count() {
    for classes in 1..=4 {
        let scalar = PerClass::Scalar(7i64);
        assert_eq!(scalar.expand(classes, "packet_size", "bm").unwrap().len(), classes);
        let singleton = PerClass::Vector(vec![7i64]);
        assert_eq!(
            singleton.expand(classes, "packet_size", "bm").unwrap().len(),
            classes
        );
        let exact = PerClass::Vector(vec![0i64; classes]);
        assert_eq!(exact.expand(classes, "packet_size", "bm").unwrap().len(), classes);
    }
}

#[test]
fn default_class_count_is_one() {
    let bm = BenchmarkConfig::from_section(BenchmarkSection {
        name: "001".to_owned(),
        injection_process: Some(PerClass::Scalar("bernoulli".to_owned())),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(bm.classes, 1);
    assert_eq!(bm.class_specs.len(), 1);
    assert_eq!(bm.class_specs[0].injection_rate, None);
}
