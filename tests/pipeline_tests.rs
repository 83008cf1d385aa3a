//! Pipeline integration tests.
//!
//! These tests exercise the full regenerate → diff → conflicts → report run
//! with fixture inventories and a scripted model transport.

use sbom_license_audit::diff::DiffEngine;
use sbom_license_audit::model::{ComponentKey, ConflictCategory, License};
use sbom_license_audit::parsers::parse_inventory;
use sbom_license_audit::pipeline::{
    AuditPipeline, FileSbomGenerator, Notifier, PipelineSettings, StaticLicenseSource,
    SurveyLicenseSource, DIFF_ARTIFACT_FILE, INVENTORY_FILE, PREVIOUS_INVENTORY_FILE,
};
use sbom_license_audit::session::{PromptTemplates, RpcSessionFactory, SessionRegistry};
use sbom_license_audit::transport::{RpcReply, RpcRequest, Transport, TransportError};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/audit");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

/// Transport answering from a queue; an exhausted queue fails the call.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<&'static str>>,
    requests: Mutex<Vec<RpcRequest>>,
}

impl ScriptedTransport {
    fn answering(replies: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().copied().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn exchange(&self, request: &RpcRequest) -> Result<RpcReply, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(result) => Ok(RpcReply::with_result(result)),
            None => Err(TransportError::EndOfStream),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    presented: Mutex<Vec<String>>,
    busy: Mutex<Vec<bool>>,
}

impl Notifier for RecordingNotifier {
    fn present(&self, report: &str) {
        self.presented.lock().unwrap().push(report.to_string());
    }

    fn set_busy(&self, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    root: PathBuf,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
    pipeline: AuditPipeline,
}

/// Project whose workspace already holds the previous inventory as `bom.xml`.
fn harness(replies: &[&'static str], own_license: Option<&str>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let workspace = root.join(".license-tool");
    std::fs::create_dir_all(&workspace).unwrap();
    std::fs::copy(fixture_path("bom-prev.xml"), workspace.join(INVENTORY_FILE)).unwrap();
    std::fs::copy(
        fixture_path("license-survey.json"),
        workspace.join("license-survey.json"),
    )
    .unwrap();

    let transport = ScriptedTransport::answering(replies);
    let notifier = Arc::new(RecordingNotifier::default());
    let templates = PromptTemplates::builtin();
    let factory = Arc::new(RpcSessionFactory::new(transport.clone(), "localhost"));
    let registry = Arc::new(SessionRegistry::new(factory, templates.system.clone()));

    let license_source: Box<dyn sbom_license_audit::pipeline::LicenseConfigSource> =
        match own_license {
            Some(license) => Box::new(StaticLicenseSource::new(License::new(license))),
            None => Box::new(SurveyLicenseSource::new(workspace.join("license-survey.json"))),
        };

    let pipeline = AuditPipeline::new(
        PipelineSettings {
            project_root: root.clone(),
            output_dir: PathBuf::from(".license-tool"),
            matrix_path: fixture_path("matrix.csv"),
            chat_model: "chat-model".to_string(),
            analysis_model: "analysis-model".to_string(),
        },
        Box::new(FileSbomGenerator::new(fixture_path("bom.xml"))),
        license_source,
        notifier.clone(),
        registry,
        templates,
    );

    Harness {
        _dir: dir,
        root,
        transport,
        notifier,
        pipeline,
    }
}

// ============================================================================
// Diff Stage
// ============================================================================

mod diff_stage {
    use super::*;

    #[test]
    fn version_bump_appears_on_both_sides() {
        let diff = DiffEngine::new()
            .diff_files(
                Some(&fixture_path("bom-prev.xml")),
                &fixture_path("bom.xml"),
            )
            .unwrap();

        let added: Vec<&str> = diff.added.iter().map(ComponentKey::as_str).collect();
        let removed: Vec<&str> = diff.removed.iter().map(ComponentKey::as_str).collect();
        assert_eq!(added, vec!["A:1:1.1:MIT", "C:1:3.0:GPL-3.0"]);
        assert_eq!(removed, vec!["A:1:1.0:MIT", "B:1:2.0:Apache-2.0"]);
    }

    #[test]
    fn missing_previous_means_everything_added() {
        let current = parse_inventory(&fixture_path("bom.xml")).unwrap();
        let diff = DiffEngine::new()
            .diff_files(Some(Path::new("/nonexistent/bom-prev.xml")), &fixture_path("bom.xml"))
            .unwrap();
        assert_eq!(diff.added, current);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn unreadable_current_is_error() {
        assert!(DiffEngine::new()
            .diff_files(None, Path::new("/nonexistent/bom.xml"))
            .is_err());
    }
}

// ============================================================================
// Full Runs
// ============================================================================

mod full_run {
    use super::*;

    #[test]
    fn single_conflict_costs_one_call_per_stage() {
        let h = harness(
            &["GPL-3.0 requires derivative works to be GPL-3.0.", "B", "Talk to legal."],
            Some("Apache-2.0"),
        );
        let outcome = h.pipeline.run(Path::new("pom.xml"));

        let partition = &outcome.analysis.partition;
        assert_eq!(partition.total(), 1);
        assert_eq!(
            partition.needs_legal[&License::new("GPL-3.0")],
            "GPL-3.0 requires derivative works to be GPL-3.0."
        );

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 3);
        // reasoning, categorization, then the change report
        assert_eq!(requests[0].args[1], "analysis-model");
        assert_eq!(requests[1].args[1], "analysis-model");
        assert_eq!(requests[2].args[1], "chat-model");
        assert!(requests[0].args[2].as_str().unwrap().contains("GPL-3.0"));

        assert_eq!(outcome.report.as_deref(), Some("Talk to legal."));
        assert_eq!(*h.notifier.presented.lock().unwrap(), vec!["Talk to legal."]);
    }

    #[test]
    fn fixable_reply_lands_in_fixable() {
        let h = harness(&["Relicense the module.", "A", "Done."], Some("Apache-2.0"));
        let outcome = h.pipeline.run(Path::new("pom.xml"));
        let partition = &outcome.analysis.partition;
        assert_eq!(partition.total(), 1);
        assert_eq!(partition.fixable.len(), 1);
        assert_eq!(
            outcome.analysis.partition.records()[0].category(),
            Some(ConflictCategory::Fixable)
        );
    }

    #[test]
    fn garbled_category_lands_in_unknown() {
        let h = harness(&["Strong copyleft.", "Probably A", "Report."], Some("Apache-2.0"));
        let outcome = h.pipeline.run(Path::new("pom.xml"));
        assert_eq!(outcome.analysis.partition.unknown.len(), 1);
        assert_eq!(outcome.analysis.partition.total(), 1);
    }

    #[test]
    fn unreachable_model_falls_back_to_plain_report() {
        let h = harness(&[], Some("Apache-2.0"));
        let outcome = h.pipeline.run(Path::new("pom.xml"));

        let partition = &outcome.analysis.partition;
        assert_eq!(partition.unknown.len(), 1);
        assert_eq!(
            partition.unknown[&License::new("GPL-3.0")],
            "Chatbot failed to analyze license conflicts."
        );
        let report = outcome.report.unwrap();
        assert!(report.contains("GPL-3.0"));
        assert_eq!(h.notifier.presented.lock().unwrap().len(), 1);
    }

    #[test]
    fn survey_supplies_own_license_and_questionnaire() {
        let h = harness(&["Copyleft.", "B", "Report."], None);
        let outcome = h.pipeline.run(Path::new("pom.xml"));
        assert_eq!(
            outcome.own_license.as_ref().map(License::license_type),
            Some("Apache-2.0")
        );
        let report_prompt = h.transport.requests()[2].args[2].as_str().unwrap().to_string();
        assert!(report_prompt.contains("\"distribution\":\"binary\""));
    }

    #[test]
    fn workspace_files_rotate() {
        let h = harness(&["Copyleft.", "B", "Report."], Some("Apache-2.0"));
        h.pipeline.run(Path::new("pom.xml"));

        let workspace = h.root.join(".license-tool");
        let previous = std::fs::read_to_string(workspace.join(PREVIOUS_INVENTORY_FILE)).unwrap();
        let current = std::fs::read_to_string(workspace.join(INVENTORY_FILE)).unwrap();
        assert!(previous.contains("<version>1.0</version>"));
        assert!(current.contains("<version>3.0</version>"));

        let artifact: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(workspace.join(DIFF_ARTIFACT_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(artifact["addedComponents"].as_array().unwrap().len(), 2);
        assert_eq!(artifact["removedComponents"].as_array().unwrap().len(), 2);
        assert_eq!(artifact["addedComponents"][1]["licenses"][0]["type"], "GPL-3.0");
    }

    #[test]
    fn second_run_without_changes_stays_quiet() {
        let h = harness(&["Copyleft.", "B", "Report."], Some("Apache-2.0"));
        h.pipeline.run(Path::new("pom.xml"));
        let outcome = h.pipeline.run(Path::new("pom.xml"));

        assert!(outcome.changes.is_empty());
        assert!(outcome.report.is_none());
        assert_eq!(h.transport.requests().len(), 3);
        assert_eq!(*h.notifier.busy.lock().unwrap(), vec![true, false, true, false]);
    }

    #[test]
    fn missing_matrix_aborts_to_empty_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let templates = PromptTemplates::builtin();
        let factory = Arc::new(RpcSessionFactory::new(
            ScriptedTransport::answering(&[]),
            "localhost",
        ));
        let pipeline = AuditPipeline::new(
            PipelineSettings {
                project_root: dir.path().to_path_buf(),
                output_dir: PathBuf::from(".license-tool"),
                matrix_path: dir.path().join("missing.csv"),
                chat_model: "gpt-4o".to_string(),
                analysis_model: "gpt-4o".to_string(),
            },
            Box::new(FileSbomGenerator::new(fixture_path("bom.xml"))),
            Box::new(StaticLicenseSource::new(License::new("Apache-2.0"))),
            notifier.clone(),
            Arc::new(SessionRegistry::new(factory, templates.system.clone())),
            templates,
        );

        let outcome = pipeline.run(Path::new("pom.xml"));
        assert!(outcome.changes.is_empty());
        assert!(outcome.own_license.is_none());
        assert_eq!(*notifier.busy.lock().unwrap(), vec![true, false]);
    }
}
