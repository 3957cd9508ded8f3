//! Mutation passes over a realistic workflow definition.

use membump_engine::{TransformMode, ValueOutcome, mutate};
use pretty_assertions::assert_eq;

/// A workflow definition shaped like the ones the tool patches in production:
/// default namespace, a global section, transition elements, and one
/// map-reduce action carrying the memory properties.
const WORKFLOW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workflow-app xmlns="uri:oozie:workflow:0.5" name="gam-spray-hourly">
    <global>
        <configuration>
            <property>
                <name>mapreduce.job.queuename</name>
                <value>ingest</value>
            </property>
        </configuration>
    </global>
    <start to="spray"/>
    <action name="spray">
        <map-reduce>
            <job-tracker>${jobTracker}</job-tracker>
            <name-node>${nameNode}</name-node>
            <configuration>
                <property>
                    <name>mapreduce.map.memory.mb</name>
                    <value>2048</value>
                </property>
                <property>
                    <name>mapreduce.map.java.opts</name>
                    <value>-Xmx1638m</value>
                </property>
                <property>
                    <name>mapreduce.reduce.memory.mb</name>
                    <value>${mapreduce.reduce.memory.mb}</value>
                </property>
                <property>
                    <name>mapreduce.reduce.java.opts</name>
                    <value>-Xmx3277M</value>
                </property>
                <property>
                    <name>yarn.app.mapreduce.am.resource.mb</name>
                    <value>1024</value>
                </property>
                <property>
                    <name>yarn.app.mapreduce.am.command-opts</name>
                    <value>-Xmx4096M</value>
                </property>
            </configuration>
        </map-reduce>
        <ok to="end"/>
        <error to="fail"/>
    </action>
    <kill name="fail">
        <message>spray failed: [${wf:errorMessage(wf:lastErrorNode())}]</message>
    </kill>
    <end name="end"/>
</workflow-app>
"#;

/// A general pass rewrites all four MapReduce properties and nothing else.
#[test]
fn general_pass_rewrites_task_memory_settings() {
    let result = mutate(WORKFLOW.as_bytes(), 1024, TransformMode::GeneralMapReduce)
        .expect("mutation pass");

    assert_eq!(result.namespace, "");
    assert_eq!(result.modified, 4);

    let output =
        String::from_utf8(result.document.expect("serialized document")).expect("utf8 output");
    let expected = WORKFLOW
        .replace("<value>2048</value>", "<value>3072</value>")
        .replace("<value>-Xmx1638m</value>", "<value>-Xmx2662m</value>")
        .replace(
            "<value>${mapreduce.reduce.memory.mb}</value>",
            "<value>-Xmx512M</value>",
        )
        .replace("<value>-Xmx3277M</value>", "<value>-Xmx4301M</value>");
    assert_eq!(output, expected);
}

/// A YARN pass rewrites only the two application-master properties.
#[test]
fn yarn_pass_rewrites_application_master_settings() {
    let result =
        mutate(WORKFLOW.as_bytes(), 2048, TransformMode::YarnOnly).expect("mutation pass");

    assert_eq!(result.modified, 2);

    let output =
        String::from_utf8(result.document.expect("serialized document")).expect("utf8 output");
    let expected = WORKFLOW
        .replace("<value>1024</value>", "<value>3072</value>")
        .replace("<value>-Xmx4096M</value>", "<value>-Xmx6144M</value>");
    assert_eq!(output, expected);
}

/// A document with no eligible properties is reported clean and never
/// re-serialized.
#[test]
fn document_without_eligible_properties_is_left_alone() {
    let doc = r#"<configuration>
    <property>
        <name>fs.defaultFS</name>
        <value>hdfs://edge:8020</value>
    </property>
</configuration>"#;
    let result =
        mutate(doc.as_bytes(), 1024, TransformMode::GeneralMapReduce).expect("mutation pass");

    assert_eq!(result.modified, 0);
    assert!(!result.changed());
    assert!(result.document.is_none());
    assert!(result.outcomes.is_empty());
}

/// Updated and unrecognized values are reported side by side.
#[test]
fn mixed_outcomes_are_reported_in_document_order() {
    let doc = r#"<configuration>
    <property>
        <name>mapreduce.map.memory.mb</name>
        <value>1024</value>
    </property>
    <property>
        <name>mapreduce.map.java.opts</name>
        <value>-server -verbose:gc</value>
    </property>
</configuration>"#;
    let result =
        mutate(doc.as_bytes(), 1024, TransformMode::GeneralMapReduce).expect("mutation pass");

    assert_eq!(result.modified, 1);
    assert_eq!(result.outcomes.len(), 2);
    assert_eq!(
        result.outcomes[0].outcome,
        ValueOutcome::Updated("2048".to_string())
    );
    assert_eq!(result.outcomes[1].outcome, ValueOutcome::Unrecognized);
    assert_eq!(result.outcomes[1].previous, "-server -verbose:gc");
}
