// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use simbench_pipeline::{Arg, Pipeline, parse_pipeline, parse_pipeline_list};

fn roundtrip(input: &str) -> Pipeline {
    let first = parse_pipeline(input).unwrap();
    let serialized = first.to_string();
    let second = parse_pipeline(&serialized).unwrap();
    assert_eq!(first, second, "'{input}' -> '{serialized}' changed the tree");
    // Serializing again must be a fixed point
    assert_eq!(serialized, second.to_string());
    first
}

#[test]
fn bare_generator() {
    let p = roundtrip("bernoulli");
    assert_eq!(p.stages.len(), 1);
    assert_eq!(p.stages[0].name, "bernoulli");
    assert!(p.stages[0].args.is_empty());
}

#[test]
fn wrapped_generator() {
    let p = roundtrip("random(bernoulli)");
    assert_eq!(p.stages.len(), 1);
    assert_eq!(p.stages[0].args, vec![Arg::Ident("bernoulli".to_owned())]);
}

#[test]
fn full_coalescing_chain() {
    let p = roundtrip("component(random(bernoulli),SMC(switch),packetize(66,18,1500,12.5))");
    assert_eq!(p.stages.len(), 3);
    assert_eq!(p.stages[2].args[3], Arg::Float(12.5));
}

#[test]
fn swm_with_option_string() {
    let p = roundtrip("component(SWM(randperm),Mppn(3),packetize(78,64,1500,12.5))");
    assert_eq!(p.stages[0].name, "SWM");
    assert_eq!(p.stages[0].args, vec![Arg::Ident("randperm".to_owned())]);
    assert_eq!(p.stages[1].args, vec![Arg::Int(3)]);
}

#[test]
fn latency_shortcut_stages() {
    roundtrip("component(SWM(barrier),latency(20,0))");
    roundtrip("component(SWM(barrier),latency(0,20))");
    roundtrip("component(random(bernoulli),Mppn(8))");
}

#[test]
fn whitespace_is_insignificant() {
    let spaced = parse_pipeline("component( random( bernoulli ), trace( get, eject ) )").unwrap();
    let tight = parse_pipeline("component(random(bernoulli),trace(get,eject))").unwrap();
    assert_eq!(spaced, tight);
}

#[test]
fn serialization_is_canonical() {
    let p = parse_pipeline("component( random( bernoulli ) , packetize(0, 1, 999999, 1.0) )")
        .unwrap();
    assert_eq!(
        p.to_string(),
        "component(random(bernoulli),packetize(0,1,999999,1.0))"
    );
}

#[test]
fn single_class_list() {
    let pipelines = parse_pipeline_list("component(random(bernoulli))").unwrap();
    assert_eq!(pipelines.len(), 1);
}

#[test]
fn braced_single_entry_list() {
    let pipelines = parse_pipeline_list("{component(random(bernoulli))}").unwrap();
    assert_eq!(pipelines.len(), 1);
    assert_eq!(pipelines[0].stages[0].name, "random");
}

#[test]
fn multi_class_list() {
    let pipelines = parse_pipeline_list("{component(random(bernoulli)),bernoulli}").unwrap();
    assert_eq!(pipelines.len(), 2);
    assert_eq!(pipelines[0].stages[0].name, "random");
    assert_eq!(pipelines[1].stages[0].name, "bernoulli");
}

#[test]
fn wrapper_position_does_not_change_meaning() {
    // Moving the random() wrapper between classes leaves each class
    // pipeline equivalent to its unwrapped form.
    let plain = parse_pipeline_list("{bernoulli,bernoulli}").unwrap();
    let first = parse_pipeline_list("{component(random(bernoulli)),bernoulli}").unwrap();
    let second = parse_pipeline_list("{bernoulli,component(random(bernoulli))}").unwrap();
    for i in 0..2 {
        assert!(plain[i].equivalent(&first[i]));
        assert!(plain[i].equivalent(&second[i]));
    }
}
