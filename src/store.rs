//! Policy persistence and the settings lifecycle
//!
//! [`PricingSettings`] is the explicit configuration value handed to
//! whatever computes order totals. It is opened once against a
//! [`PolicyStore`], which creates the singleton policy with defaults on
//! first access, and can be reloaded or updated afterwards. Concurrent
//! writers are not coordinated: the last save wins.

use crate::error::{Error, Result};
use crate::policy::{PolicyUpdate, PricingPolicy};
use crate::policy_validate::{validate_policy, PolicyValidationResult, Severity};
use chrono::Utc;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default policy document name
pub const DEFAULT_POLICY_FILE: &str = "pricing_policy.yaml";

/// Environment variable overriding the policy document path
pub const POLICY_PATH_ENV: &str = "PRINTDESK_POLICY";

/// Backing storage for the singleton policy
pub trait PolicyStore {
    /// Read the stored policy, `None` if it was never created
    fn load(&self) -> Result<Option<PricingPolicy>>;

    /// Replace the stored policy
    fn save(&self, policy: &PricingPolicy) -> Result<()>;
}

impl<S: PolicyStore + ?Sized> PolicyStore for &S {
    fn load(&self) -> Result<Option<PricingPolicy>> {
        (**self).load()
    }

    fn save(&self, policy: &PricingPolicy) -> Result<()> {
        (**self).save(policy)
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<PricingPolicy>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PricingPolicy) -> Self {
        Self {
            slot: RefCell::new(Some(policy)),
        }
    }

    /// Drop the stored policy, as if it had never been created
    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> Result<Option<PricingPolicy>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, policy: &PricingPolicy) -> Result<()> {
        *self.slot.borrow_mut() = Some(policy.clone());
        Ok(())
    }
}

/// Store holding the policy as one YAML document on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `PRINTDESK_POLICY`, falling back to `pricing_policy.yaml`
    pub fn from_env() -> Self {
        let path = std::env::var(POLICY_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_POLICY_FILE.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PolicyStore for FileStore {
    fn load(&self) -> Result<Option<PricingPolicy>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(Error::Io)?;
        let policy = PricingPolicy::from_yaml(&content).map_err(|e| {
            Error::Store(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), "loaded pricing policy");
        Ok(Some(policy))
    }

    fn save(&self, policy: &PricingPolicy) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        let mut content = String::from(
            "# Pricing policy (singleton). Edit with 'printdesk policy set'\n\
             # or validate hand edits with 'printdesk policy check'.\n\n",
        );
        content.push_str(&policy.to_yaml()?);

        std::fs::write(&self.path, content).map_err(Error::Io)?;
        debug!(path = %self.path.display(), "saved pricing policy");
        Ok(())
    }
}

/// Loaded pricing policy plus the store it came from
#[derive(Debug)]
pub struct PricingSettings<S: PolicyStore> {
    store: S,
    policy: PricingPolicy,
    created: bool,
}

impl<S: PolicyStore> PricingSettings<S> {
    /// Load the policy, creating and persisting defaults if none exists yet
    pub fn open(store: S) -> Result<Self> {
        match store.load()? {
            Some(policy) => {
                debug!(updated_at = %policy.updated_at, "pricing policy loaded");
                Ok(Self {
                    store,
                    policy,
                    created: false,
                })
            }
            None => {
                let policy = PricingPolicy::with_defaults(Utc::now());
                store.save(&policy)?;
                info!("no pricing policy found, created defaults");
                Ok(Self {
                    store,
                    policy,
                    created: true,
                })
            }
        }
    }

    /// Load an existing policy without creating one
    pub fn open_existing(store: S) -> Result<Self> {
        let policy = store
            .load()?
            .ok_or_else(|| Error::Store("No pricing policy has been created yet".into()))?;
        Ok(Self {
            store,
            policy,
            created: false,
        })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Whether `open` created the policy instead of loading it
    pub fn was_created(&self) -> bool {
        self.created
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an administrative update and persist it as is
    pub fn update(
        &mut self,
        update: PolicyUpdate,
        editor: Option<&str>,
    ) -> Result<&PricingPolicy> {
        let mut next = self.policy.clone();
        next.apply(update, editor, Utc::now());
        self.commit(next, editor)
    }

    /// Apply an update only if the resulting policy lints without errors.
    ///
    /// On rejection nothing is written and the loaded policy is unchanged.
    /// Warnings are returned so the caller can report them.
    pub fn update_checked(
        &mut self,
        update: PolicyUpdate,
        editor: Option<&str>,
    ) -> Result<PolicyValidationResult> {
        let mut next = self.policy.clone();
        next.apply(update, editor, Utc::now());

        let report = validate_policy(&next);
        if report.has_errors() {
            let errors: Vec<String> = report
                .issues
                .iter()
                .filter(|i| i.severity == Severity::Error)
                .map(|i| format!("[{}] {} ({})", i.code, i.message, i.table))
                .collect();
            warn!(errors = report.error_count(), "pricing policy update rejected");
            return Err(Error::Policy(format!(
                "update rejected: {}",
                errors.join("; ")
            )));
        }

        self.commit(next, editor)?;
        Ok(report)
    }

    fn commit(&mut self, next: PricingPolicy, editor: Option<&str>) -> Result<&PricingPolicy> {
        self.store.save(&next)?;
        info!(editor = editor.unwrap_or("-"), "pricing policy updated");
        self.policy = next;
        Ok(&self.policy)
    }

    /// Re-read the policy from the store
    pub fn reload(&mut self) -> Result<&PricingPolicy> {
        self.policy = self
            .store
            .load()?
            .ok_or_else(|| Error::Store("Pricing policy disappeared from the store".into()))?;
        debug!("pricing policy reloaded");
        Ok(&self.policy)
    }
}
