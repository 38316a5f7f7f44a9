//! Integration tests for generation and batch runs

#[cfg(test)]
mod tests {
    use crate::{
        AttemptError, CheckpointStore, FixedAnswer, GenerationError, GeneratorConfig,
        Orchestrator, OrchestratorError, RecordGenerator, RunEvent, RunObserver,
    };
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use startup_domain::traits::LlmProvider;
    use startup_domain::{CompanyRecord, NameRegistry};
    use startup_llm::{LlmError, MockProvider};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Always picks the first choice: FinTech with 3 products
    fn first_choice_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn company_reply(name: &str, products: &[&str]) -> String {
        let products: Vec<serde_json::Value> = products
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p,
                    "description": "Does a useful thing for its buyers.",
                    "target_audience": "SMBs with 20-150 employees",
                    "key_features": "• One\n• Two\n• Three",
                    "pricing_model": "Subscription"
                })
            })
            .collect();

        serde_json::json!({
            "name": name,
            "tagline": "A realistic tagline",
            "description": "A realistic description of a small, growing company.",
            "industry": "FinTech",
            "founded_year": 2021,
            "employee_count": 30,
            "headquarters": "Lisbon, Portugal",
            "website_url": format!("www.{}.com", name.to_lowercase()),
            "products": products
        })
        .to_string()
    }

    fn three_products(name: &str) -> String {
        let products = [
            format!("{} Core", name),
            format!("{} Insights", name),
            format!("{} Connect", name),
        ];
        let refs: Vec<&str> = products.iter().map(String::as_str).collect();
        company_reply(name, &refs)
    }

    /// Answers with as many products as the prompt asks for, unique names
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        last_requested: AtomicUsize,
    }

    impl LlmProvider for CountingProvider {
        type Error = LlmError;

        fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let count: usize = prompt
                .split("Generate EXACTLY ")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .and_then(|c| c.parse().ok())
                .ok_or_else(|| LlmError::Other("no product count in prompt".to_string()))?;
            self.last_requested.store(count, Ordering::SeqCst);

            let name = format!("Venture{}", n);
            let products: Vec<String> = (0..count).map(|j| format!("Tool{}x{}", n, j)).collect();
            let refs: Vec<&str> = products.iter().map(String::as_str).collect();
            Ok(company_reply(&name, &refs))
        }
    }

    fn test_config(dir: &Path, total: usize) -> GeneratorConfig {
        GeneratorConfig {
            total_companies: total,
            output_file: dir.join("startup_data.json"),
            progress_file: dir.join("generation_progress.json"),
            max_attempts: 2,
            ..GeneratorConfig::fast()
        }
    }

    fn read_output(path: &Path) -> Vec<CompanyRecord> {
        let content = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        serde_json::from_value(value["companies"].clone()).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        generating: Vec<usize>,
        failed: Vec<usize>,
    }

    impl RunObserver for Recorder {
        fn on_event(&mut self, event: &RunEvent<'_>) {
            match event {
                RunEvent::Generating { position, .. } => self.generating.push(*position),
                RunEvent::Failed { position, .. } => self.failed.push(*position),
                _ => {}
            }
        }
    }

    #[test]
    fn test_generated_company_has_requested_product_count() {
        let mut generator = RecordGenerator::new(
            CountingProvider::default(),
            StdRng::seed_from_u64(7),
            GeneratorConfig::fast(),
        );
        let mut registry = NameRegistry::new();

        for _ in 0..12 {
            let industry = generator.pick_industry();
            let record = generator.generate(industry, &mut registry).unwrap();
            let requested = generator.provider().last_requested.load(Ordering::SeqCst);
            assert!(requested == 3 || requested == 4);
            assert_eq!(record.product_count(), requested);
        }
        assert_eq!(registry.company_count(), 12);
    }

    #[test]
    fn test_duplicate_company_is_retried() {
        let llm = MockProvider::new("unused");
        llm.queue_response(three_products("LedgerLoop"));
        llm.queue_response(three_products("FreshCo"));

        let mut generator =
            RecordGenerator::new(llm.clone(), first_choice_rng(), GeneratorConfig::fast());
        let mut registry = NameRegistry::new();
        registry.register_company("ledgerloop");

        let industry = generator.pick_industry();
        let record = generator.generate(industry, &mut registry).unwrap();
        assert_eq!(record.name, "FreshCo");
        assert_eq!(llm.call_count(), 2);
        assert!(registry.is_duplicate_company("freshco"));
        assert!(registry.is_duplicate_product("FreshCo Core"));
    }

    #[test]
    fn test_duplicate_product_is_retried() {
        let llm = MockProvider::new("unused");
        llm.queue_response(company_reply("Alpha", &["Taken", "A2", "A3"]));
        llm.queue_response(company_reply("Beta", &["B1", "B2", "B3"]));

        let mut generator =
            RecordGenerator::new(llm.clone(), first_choice_rng(), GeneratorConfig::fast());
        let mut registry = NameRegistry::new();
        registry.register_product("TAKEN");

        let industry = generator.pick_industry();
        let record = generator.generate(industry, &mut registry).unwrap();
        assert_eq!(record.name, "Beta");
        // The rejected candidate left no trace
        assert!(!registry.is_duplicate_company("Alpha"));
        assert!(!registry.is_duplicate_product("A2"));
    }

    #[test]
    fn test_wrong_product_count_is_retried() {
        let llm = MockProvider::new("unused");
        llm.queue_response(company_reply("Alpha", &["A1", "A2", "A3", "A4"]));
        llm.queue_response(three_products("Alpha"));

        let mut generator =
            RecordGenerator::new(llm.clone(), first_choice_rng(), GeneratorConfig::fast());
        let mut registry = NameRegistry::new();

        let industry = generator.pick_industry();
        let record = generator.generate(industry, &mut registry).unwrap();
        assert_eq!(record.product_count(), 3);
        assert_eq!(llm.call_count(), 2);
        // Every attempt reuses the same prompt
        let prompts = llm.prompts();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[test]
    fn test_exhausted_reports_last_failure() {
        let llm = MockProvider::new("definitely not json");
        llm.queue_error();

        let config = GeneratorConfig {
            max_attempts: 3,
            ..GeneratorConfig::fast()
        };
        let mut generator = RecordGenerator::new(llm.clone(), first_choice_rng(), config);
        let mut registry = NameRegistry::new();

        let industry = generator.pick_industry();
        let err = generator.generate(industry, &mut registry).unwrap_err();
        match err {
            GenerationError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(last, AttemptError::Parse(_)));
            }
        }
        assert_eq!(llm.call_count(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_full_run_completes_and_removes_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 3);
        let mut orchestrator =
            Orchestrator::new(CountingProvider::default(), StdRng::seed_from_u64(1), config.clone());

        let mut recorder = Recorder::default();
        let summary = orchestrator.run(&mut FixedAnswer(true), &mut recorder).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.companies, 3);
        assert_eq!(summary.failures, 0);
        assert_eq!(recorder.generating, vec![1, 2, 3]);
        assert!(!config.progress_file.exists());
        assert_eq!(read_output(&config.output_file).len(), 3);
    }

    #[test]
    fn test_resume_never_regenerates_saved_slots() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 4);

        let mut saved_registry = NameRegistry::new();
        saved_registry.register_company("Saved Zero");
        saved_registry.register_company("Saved One");
        let saved: Vec<CompanyRecord> = ["Saved Zero", "Saved One"]
            .iter()
            .map(|name| serde_json::from_str(&three_products(name)).unwrap())
            .collect();
        CheckpointStore::new(&config.progress_file, 4)
            .save(&saved, 2, &saved_registry)
            .unwrap();

        let provider = CountingProvider::default();
        let mut orchestrator = Orchestrator::new(provider, StdRng::seed_from_u64(2), config.clone());
        let mut recorder = Recorder::default();
        let summary = orchestrator.run(&mut FixedAnswer(true), &mut recorder).unwrap();

        assert!(summary.completed);
        assert_eq!(recorder.generating, vec![3, 4]);
        assert_eq!(orchestrator.generator().provider().calls.load(Ordering::SeqCst), 2);
        assert!(orchestrator.registry().is_duplicate_company("saved zero"));

        let output = read_output(&config.output_file);
        assert_eq!(output.len(), 4);
        assert_eq!(output[0].name, "Saved Zero");
        assert_eq!(output[1].name, "Saved One");
    }

    #[test]
    fn test_declining_resume_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 2);

        let mut old_registry = NameRegistry::new();
        old_registry.register_company("Old Timer");
        let saved: CompanyRecord = serde_json::from_str(&three_products("Old Timer")).unwrap();
        CheckpointStore::new(&config.progress_file, 2)
            .save(&[saved], 1, &old_registry)
            .unwrap();
        std::fs::write(&config.output_file, "{\"companies\": []}").unwrap();

        let mut orchestrator =
            Orchestrator::new(CountingProvider::default(), StdRng::seed_from_u64(3), config.clone());
        let summary = orchestrator.run(&mut FixedAnswer(false), &mut ()).unwrap();

        assert!(summary.completed);
        assert!(!orchestrator.registry().is_duplicate_company("Old Timer"));
        let output = read_output(&config.output_file);
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|c| c.name != "Old Timer"));
    }

    #[test]
    fn test_resume_disabled_ignores_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            resume: false,
            ..test_config(dir.path(), 1)
        };

        let saved: CompanyRecord = serde_json::from_str(&three_products("Ignored")).unwrap();
        CheckpointStore::new(&config.progress_file, 1)
            .save(&[saved], 1, &NameRegistry::new())
            .unwrap();

        let mut orchestrator =
            Orchestrator::new(CountingProvider::default(), StdRng::seed_from_u64(4), config.clone());
        let summary = orchestrator.run(&mut FixedAnswer(true), &mut ()).unwrap();

        assert_eq!(summary.companies, 1);
        assert_ne!(read_output(&config.output_file)[0].name, "Ignored");
    }

    #[test]
    fn test_failing_last_slot_stays_pending_across_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 3);
        let checkpoint = CheckpointStore::new(&config.progress_file, 3);

        let llm = MockProvider::new("garbage");
        llm.queue_response(three_products("Aurora"));
        llm.queue_response(three_products("Borealis"));

        for _ in 0..2 {
            let mut orchestrator = Orchestrator::new(llm.clone(), first_choice_rng(), config.clone());
            let mut recorder = Recorder::default();
            let summary = orchestrator.run(&mut FixedAnswer(true), &mut recorder).unwrap();

            assert!(!summary.completed);
            assert_eq!(summary.companies, 2);
            assert_eq!(recorder.failed, vec![3]);
            assert_eq!(checkpoint.read().unwrap().unwrap().current_index, 2);
            assert_eq!(read_output(&config.output_file).len(), 2);
        }
    }

    #[test]
    fn test_failing_middle_slot_never_reaches_target() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 5);

        let llm = MockProvider::new("garbage");
        llm.queue_response(three_products("Aurora"));
        llm.queue_response(three_products("Borealis"));
        llm.queue_error();
        llm.queue_error();
        llm.queue_response(three_products("Cascade"));
        llm.queue_response(three_products("Delta"));

        let mut orchestrator = Orchestrator::new(llm.clone(), first_choice_rng(), config.clone());
        let summary = orchestrator.run(&mut FixedAnswer(true), &mut ()).unwrap();
        assert_eq!(summary.companies, 4);
        assert_eq!(summary.failures, 1);
        assert!(!summary.completed);
        assert!(config.progress_file.exists());

        // A resumed run has nothing left to try and still falls short
        let calls_before = llm.call_count();
        let mut orchestrator = Orchestrator::new(llm.clone(), first_choice_rng(), config.clone());
        let summary = orchestrator.run(&mut FixedAnswer(true), &mut ()).unwrap();
        assert_eq!(llm.call_count(), calls_before);
        assert_eq!(summary.companies, 4);
        assert!(read_output(&config.output_file).len() < 5);
    }

    #[test]
    fn test_cancel_flag_interrupts_before_next_slot() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), 3);

        let flag = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let mut orchestrator =
            Orchestrator::new(CountingProvider::default(), first_choice_rng(), config.clone())
                .with_cancel_flag(Arc::clone(&flag));

        let result = orchestrator.run(&mut FixedAnswer(true), &mut ());
        assert!(matches!(
            result,
            Err(OrchestratorError::Interrupted {
                completed: 0,
                next_index: 0
            })
        ));
        assert!(!config.output_file.exists());
    }
}
