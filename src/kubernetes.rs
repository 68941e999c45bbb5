use anyhow::Result;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::{api::ListParams, Api, Client};

/// Lists pods in the given namespaces, or in every namespace when none are given.
pub async fn list_pods(client: &Client, namespaces: &[String]) -> Result<Vec<Pod>> {
    if namespaces.is_empty() {
        let pod_api: Api<Pod> = Api::all(client.clone());
        return Ok(pod_api.list(&ListParams::default()).await?.items);
    }

    let mut pods = Vec::new();
    for ns in namespaces {
        let pod_api: Api<Pod> = Api::namespaced(client.clone(), ns);
        pods.extend(pod_api.list(&ListParams::default()).await?.items);
    }
    Ok(pods)
}

pub async fn list_nodes(client: &Client) -> Result<Vec<Node>> {
    let node_api: Api<Node> = Api::all(client.clone());
    Ok(node_api.list(&ListParams::default()).await?.items)
}
