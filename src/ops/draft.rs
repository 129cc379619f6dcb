use crate::model::idea::{Category, IdeaDraft, NewIdea, Status};

/// Canned impact sentence for an imported idea, chosen by category.
pub fn impact_for(category: Category) -> String {
    let benefit = match category {
        Category::CostSaving => "penghematan biaya",
        Category::RevenueGrowth => "peningkatan revenue",
        Category::Both => "efisiensi operasional dan peningkatan revenue",
    };
    format!("Berpotensi memberikan dampak positif melalui {}.", benefit)
}

/// Turn reviewed drafts into submittable ideas sharing one proposer and date.
///
/// New ideas start as `NotStarted` with no start or end date.
pub fn expand_drafts(drafts: &[IdeaDraft], proposer_name: &str, idea_date: &str) -> Vec<NewIdea> {
    drafts
        .iter()
        .map(|draft| NewIdea {
            proposer_name: proposer_name.to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category,
            priority: draft.priority,
            status: Status::NotStarted,
            idea_date: idea_date.to_string(),
            start_date: None,
            end_date: None,
            impact: impact_for(draft.category),
        })
        .collect()
}
