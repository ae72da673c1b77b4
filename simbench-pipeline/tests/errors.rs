// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use simbench_pipeline::{parse_pipeline, parse_pipeline_list};

#[test]
#[should_panic(expected = "unbalanced parentheses")]
fn unbalanced_parentheses() {
    parse_pipeline("component(random(bernoulli)").unwrap();
}

#[test]
#[should_panic(expected = "unexpected ')'")]
fn extra_closing_parenthesis() {
    parse_pipeline("component(random(bernoulli)))").unwrap();
}

#[test]
#[should_panic(expected = "unknown stage 'bernouli'")]
fn unknown_stage_name() {
    parse_pipeline("bernouli").unwrap();
}

#[test]
#[should_panic(expected = "unknown stage")]
fn stage_names_are_case_sensitive() {
    parse_pipeline("component(random(bernoulli),smc(switch))").unwrap();
}

#[test]
#[should_panic(expected = "takes 4 argument(s), got 3")]
fn packetize_wrong_arity() {
    parse_pipeline("component(random(bernoulli),packetize(66,18,1500))").unwrap();
}

#[test]
#[should_panic(expected = "takes 1 argument(s), got 2")]
fn random_wrong_arity() {
    parse_pipeline("random(bernoulli,uniform)").unwrap();
}

#[test]
#[should_panic(expected = "SMC expects 'switch' or 'end'")]
fn smc_bad_side() {
    parse_pipeline("component(random(bernoulli),SMC(middle))").unwrap();
}

#[test]
#[should_panic(expected = "cannot generate traffic")]
fn modifier_cannot_lead_the_chain() {
    parse_pipeline("component(packetize(66,18,1500,12.5))").unwrap();
}

#[test]
#[should_panic(expected = "must be the first stage")]
fn generator_cannot_follow_a_stage() {
    parse_pipeline("component(random(bernoulli),random(uniform))").unwrap();
}

#[test]
#[should_panic(expected = "empty argument list")]
fn empty_argument_list() {
    parse_pipeline("random()").unwrap();
}

#[test]
#[should_panic(expected = "may only appear at the root")]
fn nested_component_rejected() {
    parse_pipeline("component(component(random(bernoulli)))").unwrap();
}

#[test]
#[should_panic(expected = "unbalanced braces")]
fn unterminated_class_list() {
    parse_pipeline_list("{bernoulli,bernoulli").unwrap();
}

#[test]
#[should_panic(expected = "empty pipeline in class list")]
fn empty_class_entry() {
    parse_pipeline_list("{bernoulli,}").unwrap();
}

#[test]
#[should_panic(expected = "numeric literal is not a stage")]
fn literal_stage_rejected() {
    parse_pipeline("component(random(bernoulli),7)").unwrap();
}
