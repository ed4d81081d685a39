use tracing::debug;

use crate::Result;
use crate::error::ZbxError;

use super::ZbxClient;
use super::models::{Application, WireApplication, convert_all};
use super::query::ApplicationQuery;
use super::rpc::ZbxRpc;

const APPLICATION_GET: &str = "application.get";

/// Query `application.get` and map the rows to [`Application`] values.
///
/// The server order is preserved.
///
/// # Errors
///
/// - [`ZbxError::NotFound`] when the call succeeds but matches nothing.
/// - [`ZbxError::FieldParse`] when a row carries a non-numeric `hostid` or
///   `applicationid`; no partial result is returned.
/// - Any error of the RPC layer, unchanged.
pub async fn get_applications<R>(rpc: &R, query: &ApplicationQuery) -> Result<Vec<Application>>
where
    R: ZbxRpc,
{
    let params = serde_json::to_value(query).map_err(|err| ZbxError::Json {
        message: format!("error encoding {APPLICATION_GET} parameters: {err}"),
    })?;

    let rows: Vec<WireApplication> = rpc.invoke(APPLICATION_GET, params).await?;
    if rows.is_empty() {
        return Err(ZbxError::NotFound {
            resource: "application",
        }
        .into());
    }

    let applications = convert_all(rows)?;
    debug!(count = applications.len(), "applications fetched");
    Ok(applications)
}

impl ZbxClient {
    /// See [`get_applications`].
    ///
    /// # Errors
    ///
    /// Same as [`get_applications`].
    pub async fn applications(&self, query: &ApplicationQuery) -> Result<Vec<Application>> {
        get_applications(self, query).await
    }
}
