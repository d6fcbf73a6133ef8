use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use vacant_core::{
    group_by_platform, Platform, PlatformVacancies, SalaryRange, SalaryRangeFilter,
    VacancyFilter,
};
use vacant_engine::{
    HhSource, JsonVacancyStore, Orchestrator, SearchOutcome, SearchRequest, SuperJobSource,
};
use vacant_logging::{vacant_info, vacant_warn};

use crate::config::AppConfig;
use crate::output::{print_outcome, print_vacancies};
use crate::prompt::{Prompter, Session};

/// Wires the orchestrator and the store to the command-line operations.
pub struct App {
    orchestrator: Orchestrator,
    store_path: PathBuf,
    runtime: Runtime,
}

impl App {
    pub fn new(orchestrator: Orchestrator, store_path: PathBuf) -> Result<Self> {
        let runtime = Runtime::new().context("starting the async runtime")?;
        Ok(Self {
            orchestrator,
            store_path,
            runtime,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let hh = HhSource::new(config.sources.clone(), config.hh_user_agent.clone())
            .context("building the HH.ru client")?;
        let superjob = SuperJobSource::new(config.sources.clone(), config.superjob_api_key.clone())
            .context("building the SuperJob.ru client")?;
        let orchestrator = Orchestrator::new()
            .with_source(Arc::new(hh))
            .with_source(Arc::new(superjob));
        Self::new(orchestrator, config.store_path.clone())
    }

    fn open_store(&self) -> Result<JsonVacancyStore> {
        JsonVacancyStore::open(&self.store_path)
            .with_context(|| format!("opening store {:?}", self.store_path))
    }

    pub fn search(&self, request: &SearchRequest) -> SearchOutcome {
        vacant_info!(
            "Searching {:?} for {:?} ({} per platform)",
            request.platforms,
            request.keyword,
            request.count
        );
        self.runtime.block_on(self.orchestrator.search(request))
    }

    /// Overwrites the store with every record of `vacancies`, platform by platform.
    pub fn save(&self, vacancies: &PlatformVacancies) -> Result<usize> {
        let mut store = self.open_store()?;
        let records: Vec<_> = vacancies.values().flatten().cloned().collect();
        let saved = records.len();
        store.replace_all(records);
        store.flush().context("writing the store")?;
        vacant_info!("Saved {} vacancies to {:?}", saved, self.store_path);
        Ok(saved)
    }

    /// Stored records grouped by platform and salary-filtered per group.
    ///
    /// An empty `platforms` slice means every platform in the store.
    pub fn stored(&self, platforms: &[Platform], salary: SalaryRange) -> Result<PlatformVacancies> {
        let store = self.open_store()?;
        let filter = SalaryRangeFilter::new(salary);
        let grouped: PlatformVacancies = group_by_platform(store.records().iter().cloned())
            .into_iter()
            .filter(|(name, _)| {
                platforms.is_empty() || platforms.iter().any(|platform| platform.name() == name.as_str())
            })
            .map(|(name, records)| (name, filter.filter_vacancies(&records)))
            .collect();
        Ok(grouped)
    }

    /// Deletes every stored record of `platform` with `vacancy_id`.
    ///
    /// Returns how many were removed; zero is logged, not an error.
    pub fn delete(&self, platform: Platform, vacancy_id: i64) -> Result<usize> {
        let mut store = self.open_store()?;
        let targets: Vec<_> = store
            .find(platform.name(), vacancy_id)
            .into_iter()
            .cloned()
            .collect();
        if targets.is_empty() {
            vacant_warn!("Vacancy {} not found on {}", vacancy_id, platform);
            return Ok(0);
        }
        let removed = targets.iter().filter(|record| store.delete(record)).count();
        store.flush().context("writing the store")?;
        Ok(removed)
    }

    pub fn run_search(
        &self,
        request: &SearchRequest,
        save: bool,
        out: &mut impl Write,
    ) -> Result<()> {
        let outcome = self.search(request);
        print_outcome(out, &outcome)?;
        if save {
            let saved = self.save(&outcome.vacancies)?;
            writeln!(out, "Saved {saved} vacancies to {}", self.store_path.display())?;
        }
        Ok(())
    }

    pub fn run_stored(
        &self,
        platforms: &[Platform],
        salary: SalaryRange,
        out: &mut impl Write,
    ) -> Result<()> {
        let vacancies = self.stored(platforms, salary)?;
        print_vacancies(out, &vacancies)?;
        Ok(())
    }

    pub fn run_delete(
        &self,
        platform: Platform,
        vacancy_id: i64,
        out: &mut impl Write,
    ) -> Result<()> {
        let removed = self.delete(platform, vacancy_id)?;
        if removed == 0 {
            writeln!(out, "Vacancy {vacancy_id} not found on {platform}")?;
        } else {
            writeln!(out, "Deleted {removed} vacancy record(s)")?;
        }
        Ok(())
    }

    pub fn run_interactive<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<()> {
        let mut prompter = Prompter::new(input, output);
        let session = match prompter.collect(self.store_path.exists()) {
            Ok(session) => session,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Session::Quit,
            Err(err) => return Err(err.into()),
        };
        let Session::Run(choices) = session else {
            return Ok(());
        };

        if choices.read_from_store {
            let vacancies = self.stored(&choices.platforms, choices.salary)?;
            print_vacancies(prompter.output(), &vacancies)?;
            return Ok(());
        }

        let request = SearchRequest {
            platforms: choices.platforms,
            keyword: choices.keyword,
            count: choices.count,
            salary: choices.salary,
        };
        let outcome = self.search(&request);
        print_outcome(prompter.output(), &outcome)?;

        match prompter.confirm("Do you want to save vacancies to json? (y/N): ") {
            Ok(true) => {
                self.save(&outcome.vacancies)?;
            }
            Ok(false) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {}
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}
