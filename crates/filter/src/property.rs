//! Update properties addressable from a predicate

use upkeep_errors::FilterError;
use upkeep_types::Update;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Title,
    UpdateId,
    KbArticleIds,
    Categories,
    MaxDownloadSize,
    LastDeploymentChangeTime,
    CanRequestUserInput,
    IsDownloaded,
    IsMandatory,
}

impl Property {
    /// Resolve a dotted path below `$_`, e.g. `["Identity", "UpdateID"]`
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownProperty` for any other path.
    pub fn resolve(path: &[String]) -> Result<Self, FilterError> {
        let lowered: Vec<String> = path.iter().map(|p| p.to_ascii_lowercase()).collect();
        let parts: Vec<&str> = lowered.iter().map(String::as_str).collect();
        let property = match parts.as_slice() {
            ["title"] => Self::Title,
            ["identity", "updateid"] | ["updateid"] => Self::UpdateId,
            ["kbarticleids"] => Self::KbArticleIds,
            ["categories"] | ["categories", "name"] => Self::Categories,
            ["maxdownloadsize"] => Self::MaxDownloadSize,
            ["lastdeploymentchangetime"] => Self::LastDeploymentChangeTime,
            ["installationbehavior", "canrequestuserinput"] => Self::CanRequestUserInput,
            ["isdownloaded"] => Self::IsDownloaded,
            ["ismandatory"] => Self::IsMandatory,
            _ => {
                return Err(FilterError::UnknownProperty {
                    property: path.join("."),
                })
            }
        };
        Ok(property)
    }

    #[must_use]
    pub fn read(self, update: &Update) -> Value {
        match self {
            Self::Title => Value::Str(update.title.clone()),
            Self::UpdateId => Value::Str(update.id.as_str().to_string()),
            Self::KbArticleIds => Value::List(
                update
                    .kb_article_ids
                    .iter()
                    .map(|kb| Value::Str(kb.clone()))
                    .collect(),
            ),
            Self::Categories => Value::List(
                update
                    .categories
                    .iter()
                    .map(|c| Value::Str(c.clone()))
                    .collect(),
            ),
            Self::MaxDownloadSize => {
                Value::Int(i64::try_from(update.max_download_size).unwrap_or(i64::MAX))
            }
            Self::LastDeploymentChangeTime => Value::Date(update.last_deployment_change_time),
            Self::CanRequestUserInput => {
                Value::Bool(update.installation_behavior.can_request_user_input)
            }
            Self::IsDownloaded => Value::Bool(update.is_downloaded),
            Self::IsMandatory => Value::Bool(update.is_mandatory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Vec<String> {
        s.split('.').map(str::to_string).collect()
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!(
            Property::resolve(&path("identity.UPDATEID")).unwrap(),
            Property::UpdateId
        );
        assert_eq!(Property::resolve(&path("UpdateID")).unwrap(), Property::UpdateId);
        assert_eq!(
            Property::resolve(&path("InstallationBehavior.CanRequestUserInput")).unwrap(),
            Property::CanRequestUserInput
        );
    }

    #[test]
    fn unknown_path_names_the_whole_path() {
        assert_eq!(
            Property::resolve(&path("InstallationBehavior.RebootBehavior")).unwrap_err(),
            FilterError::UnknownProperty {
                property: "InstallationBehavior.RebootBehavior".into()
            }
        );
    }
}
