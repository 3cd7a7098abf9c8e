//! Windows Update Agent client
//!
//! Every search opens a new `UpdateSession`. The COM update objects it
//! returns are kept, keyed by update id, so that license acceptance,
//! download and install act on the exact objects the search produced.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use upkeep_errors::{Error, UpdateServiceError};
use upkeep_types::{
    DownloadPriority, DownloadResult, InstallResult, InstallationBehavior, ResultCode,
    SearchResult, Update, UpdateCollection, UpdateId, UpdateResult,
};
use windows::core::BSTR;
use windows::Win32::Foundation::DECIMAL;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::System::UpdateAgent::{
    self as wua, IUpdate, IUpdateCollection, IUpdateSession, OperationResultCode,
};

use super::com;
use crate::service::UpdateService;

pub struct WindowsUpdateAgent {
    client_application_id: BSTR,
    session: RefCell<Option<IUpdateSession>>,
    found: RefCell<HashMap<UpdateId, IUpdate>>,
}

impl WindowsUpdateAgent {
    /// # Errors
    ///
    /// Returns an error if COM cannot be initialized on this thread.
    pub fn new(client_application_id: &str) -> Result<Self, Error> {
        com::initialize()?;
        Ok(Self {
            client_application_id: BSTR::from(client_application_id),
            session: RefCell::new(None),
            found: RefCell::new(HashMap::new()),
        })
    }

    fn open_session(&self) -> Result<IUpdateSession, Error> {
        let unavailable = |e: windows::core::Error| -> Error {
            UpdateServiceError::SessionUnavailable {
                message: com::describe(&e),
            }
            .into()
        };

        let session: IUpdateSession =
            unsafe { CoCreateInstance(&wua::UpdateSession, None, CLSCTX_INPROC_SERVER) }
                .map_err(unavailable)?;
        unsafe { session.SetClientApplicationID(&self.client_application_id) }
            .map_err(unavailable)?;
        Ok(session)
    }

    fn current_session(&self) -> Result<IUpdateSession, Error> {
        self.session.borrow().clone().ok_or_else(|| {
            UpdateServiceError::SessionUnavailable {
                message: "no search has been run in this process".to_string(),
            }
            .into()
        })
    }

    /// COM collection holding the search objects for `updates`, in order
    fn com_collection(
        &self,
        updates: &UpdateCollection,
        failed: impl Fn(windows::core::Error) -> Error,
    ) -> Result<IUpdateCollection, Error> {
        let found = self.found.borrow();
        let collection: IUpdateCollection =
            unsafe { CoCreateInstance(&wua::UpdateCollection, None, CLSCTX_INPROC_SERVER) }
                .map_err(&failed)?;
        for update in updates {
            let item = found
                .get(&update.id)
                .ok_or_else(|| UpdateServiceError::UnknownUpdate {
                    id: update.id.to_string(),
                })?;
            unsafe { collection.Add(item) }.map_err(&failed)?;
        }
        Ok(collection)
    }
}

#[async_trait(?Send)]
impl UpdateService for WindowsUpdateAgent {
    async fn search(&self, criteria: &str) -> Result<SearchResult, Error> {
        let failed = |e: windows::core::Error| -> Error {
            UpdateServiceError::SearchFailed {
                message: com::describe(&e),
            }
            .into()
        };

        let session = self.open_session()?;
        let result = unsafe {
            let searcher = session.CreateUpdateSearcher().map_err(failed)?;
            searcher.Search(&BSTR::from(criteria)).map_err(failed)?
        };
        let result_code = result_code(unsafe { result.ResultCode() }.map_err(failed)?);

        let items = unsafe { result.Updates() }.map_err(failed)?;
        let count = unsafe { items.Count() }.map_err(failed)?;
        let mut found = HashMap::new();
        let mut updates = UpdateCollection::new();
        for index in 0..count {
            let item = unsafe { items.get_Item(index) }.map_err(failed)?;
            let update = read_update(&item).map_err(failed)?;
            found.insert(update.id.clone(), item);
            updates.push(update);
        }

        tracing::debug!(%result_code, count, "windows update search returned");
        *self.session.borrow_mut() = Some(session);
        *self.found.borrow_mut() = found;
        Ok(SearchResult {
            result_code,
            updates,
        })
    }

    async fn accept_eula(&self, update: &Update) -> Result<(), Error> {
        let failed = |e: windows::core::Error| -> Error {
            UpdateServiceError::EulaFailed {
                title: update.title.clone(),
                message: com::describe(&e),
            }
            .into()
        };

        let found = self.found.borrow();
        let item = found
            .get(&update.id)
            .ok_or_else(|| UpdateServiceError::UnknownUpdate {
                id: update.id.to_string(),
            })?;
        unsafe {
            if !item.EulaAccepted().map_err(failed)?.as_bool() {
                item.AcceptEula().map_err(failed)?;
            }
        }
        Ok(())
    }

    async fn download(
        &self,
        updates: &UpdateCollection,
        priority: DownloadPriority,
    ) -> Result<DownloadResult, Error> {
        let failed = |e: windows::core::Error| -> Error {
            UpdateServiceError::DownloadFailed {
                message: com::describe(&e),
            }
            .into()
        };

        let session = self.current_session()?;
        let collection = self.com_collection(updates, failed)?;
        let result = unsafe {
            let downloader = session.CreateUpdateDownloader().map_err(failed)?;
            downloader.SetUpdates(&collection).map_err(failed)?;
            downloader
                .SetPriority(wua::DownloadPriority(priority.as_raw()))
                .map_err(failed)?;
            downloader.Download().map_err(failed)?
        };
        let result_code = result_code(unsafe { result.ResultCode() }.map_err(failed)?);

        let found = self.found.borrow();
        let mut downloaded = BTreeSet::new();
        for update in updates {
            if let Some(item) = found.get(&update.id) {
                if unsafe { item.IsDownloaded() }.map_err(failed)?.as_bool() {
                    downloaded.insert(update.id.clone());
                }
            }
        }

        Ok(DownloadResult {
            result_code,
            downloaded,
        })
    }

    async fn install(&self, updates: &UpdateCollection) -> Result<InstallResult, Error> {
        let failed = |e: windows::core::Error| -> Error {
            UpdateServiceError::InstallFailed {
                message: com::describe(&e),
            }
            .into()
        };

        let session = self.current_session()?;
        let collection = self.com_collection(updates, failed)?;
        let result = unsafe {
            let installer = session.CreateUpdateInstaller().map_err(failed)?;
            installer.SetUpdates(&collection).map_err(failed)?;
            installer.Install().map_err(failed)?
        };

        let result_code = result_code(unsafe { result.ResultCode() }.map_err(failed)?);
        let reboot_required = unsafe { result.RebootRequired() }.map_err(failed)?.as_bool();

        let mut update_results = Vec::with_capacity(updates.len());
        for (index, update) in updates.iter().enumerate() {
            let Ok(index) = i32::try_from(index) else {
                break;
            };
            let code = unsafe {
                let item_result = result.GetUpdateResult(index).map_err(failed)?;
                item_result.ResultCode().map_err(failed)?
            };
            update_results.push(UpdateResult {
                id: update.id.clone(),
                result_code: result_code(code),
            });
        }

        Ok(InstallResult {
            result_code,
            reboot_required,
            update_results,
        })
    }
}

fn result_code(code: OperationResultCode) -> ResultCode {
    ResultCode::from_raw(code.0).unwrap_or(ResultCode::Failed)
}

fn read_update(item: &IUpdate) -> windows::core::Result<Update> {
    unsafe {
        let id = item.Identity()?.UpdateID()?.to_string();

        let kb_ids = item.KBArticleIDs()?;
        let mut kb_article_ids = Vec::new();
        for index in 0..kb_ids.Count()? {
            kb_article_ids.push(kb_ids.get_Item(index)?.to_string());
        }

        let category_items = item.Categories()?;
        let mut categories = Vec::new();
        for index in 0..category_items.Count()? {
            categories.push(category_items.get_Item(index)?.Name()?.to_string());
        }

        Ok(Update {
            id: UpdateId::new(id),
            title: item.Title()?.to_string(),
            kb_article_ids,
            categories,
            last_deployment_change_time: from_ole_date(item.LastDeploymentChangeTime()?),
            max_download_size: decimal_bytes(&item.MaxDownloadSize()?),
            installation_behavior: InstallationBehavior {
                can_request_user_input: item
                    .InstallationBehavior()?
                    .CanRequestUserInput()?
                    .as_bool(),
            },
            is_mandatory: item.IsMandatory()?.as_bool(),
            is_downloaded: item.IsDownloaded()?.as_bool(),
        })
    }
}

/// OLE automation date: days since 1899-12-30, fraction is the time of day
#[allow(clippy::cast_possible_truncation)]
fn from_ole_date(days: f64) -> DateTime<Utc> {
    let millis = (days * 86_400_000.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?))
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |naive| naive.and_utc())
}

/// Download sizes are whole byte counts, so the low 64 bits carry the value
fn decimal_bytes(value: &DECIMAL) -> u64 {
    unsafe { value.Anonymous2.Lo64 }
}
