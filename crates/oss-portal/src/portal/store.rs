//! In-process fixture store shared by every engine.
//!
//! Engines read through `&FixtureStore`; mutations take `&mut FixtureStore`, so a write is
//! visible to the very next read. The HTTP layer wraps one store in [`SharedStore`].

use std::sync::{Arc, RwLock};

use tracing::info;

use super::applications::{self, Application};
use super::bundles::{self, Bundle, BundlePurchase};
use super::devices::{self, BiometricDevice};
use super::documents::{self, Document};
use super::ledger::{self, LedgerRecord};
use super::notifications::{self, Notification};
use super::officers::{self, Officer};
use super::sla::{self, Agency};
use super::talent::{self, DistrictTalent, TalentImportError};
use crate::config::PortalConfig;

pub type SharedStore = Arc<RwLock<FixtureStore>>;

#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    pub applications: Vec<Application>,
    pub officers: Vec<Officer>,
    pub agencies: Vec<Agency>,
    pub bundles: Vec<Bundle>,
    pub purchases: Vec<BundlePurchase>,
    pub districts: Vec<DistrictTalent>,
    pub ledger: Vec<LedgerRecord>,
    pub documents: Vec<Document>,
    pub devices: Vec<BiometricDevice>,
    pub notifications: Vec<Notification>,
    purchase_sequence: u32,
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard portal fixtures with the bundled talent dataset.
    pub fn seeded() -> Result<Self, TalentImportError> {
        Ok(Self::with_districts(talent::bundled()?))
    }

    /// Seeded fixtures, reading districts from `talent_csv` when configured.
    pub fn from_config(config: &PortalConfig) -> Result<Self, TalentImportError> {
        let districts = match &config.talent_csv {
            Some(path) => {
                info!(path = %path.display(), "loading district talent dataset");
                talent::load_from_path(path)?
            }
            None => talent::bundled()?,
        };
        Ok(Self::with_districts(districts))
    }

    fn with_districts(districts: Vec<DistrictTalent>) -> Self {
        let purchases = bundles::catalogue::purchases();
        let purchase_sequence = u32::try_from(purchases.len()).unwrap_or(u32::MAX);

        Self {
            applications: applications::seed::applications(),
            officers: officers::seed(),
            agencies: sla::seed(),
            bundles: bundles::catalogue::bundles(),
            purchases,
            districts,
            ledger: ledger::seed(),
            documents: documents::seed(),
            devices: devices::seed(),
            notifications: notifications::seed(),
            purchase_sequence,
        }
    }

    /// Allocate the next `PUR-NNNN` id.
    pub fn next_purchase_id(&mut self) -> String {
        self.purchase_sequence = self.purchase_sequence.saturating_add(1);
        format!("PUR-{:04}", self.purchase_sequence)
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }
}
