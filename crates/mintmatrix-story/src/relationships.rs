//! Relationship Aggregator

use crate::StoryClient;
use mintmatrix_domain::{EdgeFilter, FamilyTree, IpRelationships};

impl StoryClient {
    /// Parents and children of one asset
    ///
    /// Two sequential edge fetches, child-side first. Either side degrades
    /// to empty on failure; results are not cached or deduplicated.
    pub async fn get_ip_relationships(&self, ip_id: &str) -> IpRelationships {
        let parents = self.fetch_edges(&EdgeFilter::by_child(ip_id)).await;
        let children = self.fetch_edges(&EdgeFilter::by_parent(ip_id)).await;

        tracing::info!(
            ip_id,
            parents = parents.len(),
            children = children.len(),
            "Aggregated relationships"
        );
        IpRelationships::new(parents, children)
    }

    /// Relationships plus one more generation in each direction
    ///
    /// Only the first [`StoryClient::family_expansion`] parents and children
    /// are expanded, one sequential fetch each.
    pub async fn get_family_tree(&self, ip_id: &str) -> FamilyTree {
        let relationships = self.get_ip_relationships(ip_id).await;
        let mut tree = FamilyTree::from_relationships(ip_id, &relationships);
        let limit = self.family_expansion();

        for parent in relationships.parents.iter().take(limit) {
            let ancestors = self
                .fetch_edges(&EdgeFilter::by_child(parent.parent_ip_id.as_str()))
                .await;
            tree.ancestors.extend(ancestors);
        }

        for child in relationships.children.iter().take(limit) {
            let descendants = self
                .fetch_edges(&EdgeFilter::by_parent(child.ip_id.as_str()))
                .await;
            tree.descendants.extend(descendants);
        }

        tracing::debug!(
            ip_id,
            ancestors = tree.ancestors.len(),
            descendants = tree.descendants.len(),
            "Expanded family tree"
        );
        tree
    }
}
