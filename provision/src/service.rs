use crate::cluster::{ClusterApi, HttpClusterClient};
use crate::error::ProvisionResult;
use crate::generator::{IdGenerator, RandomIdGenerator};
use crate::reconcile::{
    ClusterSession, Operation, PassReport, Platform, add_user_group, apply_cluster,
    apply_repository, destroy_cluster, destroy_repository, remove_user_group,
};
use crate::repository::HttpRepositoryClient;
use config::{AuthFailurePolicy, ClusterEndpointConfig, RepositoryEndpointConfig};
use schema::{ClusterSchema, RepositorySchema, TierClassifier, UserGroup};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Reports of every pass of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub reports: Vec<PassReport>,
}

impl Summary {
    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(PassReport::succeeded)
    }

    pub fn merge(&mut self, other: Summary) {
        self.reports.extend(other.reports);
    }

    pub fn failed_passes(&self) -> usize {
        self.reports.iter().filter(|r| !r.succeeded()).count()
    }
}

/// Runs reconciliation passes against every configured endpoint URL of a
/// platform, one URL after the other.
pub struct ProvisionService {
    ids: Arc<dyn IdGenerator>,
    classifier: TierClassifier,
}

impl Default for ProvisionService {
    fn default() -> Self {
        Self::new(Arc::new(RandomIdGenerator), TierClassifier::default())
    }
}

impl ProvisionService {
    pub fn new(ids: Arc<dyn IdGenerator>, classifier: TierClassifier) -> Self {
        Self { ids, classifier }
    }

    pub async fn repository_pass(
        &self,
        config: &RepositoryEndpointConfig,
        schema: &RepositorySchema,
        operation: Operation,
    ) -> Summary {
        let mut summary = Summary::default();

        for url in config.endpoint.url.iter() {
            info!(url = %url, operation = %operation, "Starting repository manager pass");
            let client = match HttpRepositoryClient::new(url, config, self.ids.clone()) {
                Ok(client) => client,
                Err(e) => {
                    error!(url = %url, error = %e, "Cannot build repository manager client");
                    let mut report = PassReport::new(Platform::Repository, operation, url);
                    report.abort(e);
                    summary.reports.push(report);
                    continue;
                }
            };

            let report = match operation {
                Operation::Apply => apply_repository(&client, schema).await,
                Operation::Destroy => destroy_repository(&client, schema).await,
            };
            summary.reports.push(report);
        }

        summary
    }

    pub async fn cluster_pass(
        &self,
        config: &ClusterEndpointConfig,
        schema: &ClusterSchema,
        operation: Operation,
    ) -> Summary {
        let mut summary = Summary::default();

        for url in config.endpoint.url.iter() {
            info!(url = %url, operation = %operation, "Starting cluster pass");
            let (client, session) = match self.connect(url, config, operation).await {
                Ok(connected) => connected,
                Err(report) => {
                    summary.reports.push(report);
                    continue;
                }
            };

            let report = match operation {
                Operation::Apply => apply_cluster(&client, &session, schema).await,
                Operation::Destroy => destroy_cluster(&client, &session, schema).await,
            };
            summary.reports.push(report);
        }

        summary
    }

    /// Adds (`Apply`) or removes (`Destroy`) a single user group on every
    /// cluster endpoint.
    pub async fn group_pass(
        &self,
        config: &ClusterEndpointConfig,
        schema: &ClusterSchema,
        group: &UserGroup,
        operation: Operation,
    ) -> Summary {
        let mut summary = Summary::default();

        for url in config.endpoint.url.iter() {
            info!(url = %url, gid = %group.gid, operation = %operation, "Starting user group pass");
            let (client, session) = match self.connect(url, config, operation).await {
                Ok(connected) => connected,
                Err(report) => {
                    summary.reports.push(report);
                    continue;
                }
            };

            let report = match operation {
                Operation::Apply => add_user_group(&client, &session, schema, group).await,
                Operation::Destroy => remove_user_group(&client, &session, &group.gid).await,
            };
            summary.reports.push(report);
        }

        summary
    }

    /// Builds the client for one cluster URL and obtains its token. An
    /// aborted report is returned when the pass must not run.
    async fn connect(
        &self,
        url: &str,
        config: &ClusterEndpointConfig,
        operation: Operation,
    ) -> Result<(HttpClusterClient, ClusterSession), PassReport> {
        let aborted = |reason: String| {
            let mut report = PassReport::new(Platform::Cluster, operation, url);
            report.abort(reason);
            report.log_summary();
            report
        };

        let client = HttpClusterClient::new(url, config).map_err(|e| {
            error!(url = %url, error = %e, "Cannot build cluster client");
            aborted(e.to_string())
        })?;

        let session = self
            .open_session(&client, config)
            .await
            .map_err(|e| aborted(e.to_string()))?;

        Ok((client, session))
    }

    /// Classifies the endpoint and logs in, honouring `on_auth_failure`.
    pub async fn open_session(
        &self,
        client: &dyn ClusterApi,
        config: &ClusterEndpointConfig,
    ) -> ProvisionResult<ClusterSession> {
        let tier = self.classifier.classify(client.endpoint());
        info!(url = %client.endpoint(), tier = %tier, "Classified cluster endpoint");

        match client
            .login(&config.endpoint.user, &config.endpoint.password)
            .await
        {
            Ok(token) => Ok(ClusterSession { token, tier }),
            Err(e) => {
                error!(url = %client.endpoint(), error = %e, "Cluster login failed");
                match config.on_auth_failure {
                    AuthFailurePolicy::Abort => Err(e),
                    AuthFailurePolicy::Proceed => {
                        warn!(
                            url = %client.endpoint(),
                            "Continuing without API token, requests will likely be rejected"
                        );
                        Ok(ClusterSession {
                            token: String::new(),
                            tier,
                        })
                    }
                }
            }
        }
    }
}
