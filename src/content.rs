//! Static copy for the home and research pages.

pub const BRAND: &str = "AutismRecover";

// --- Home ------------------------------------------------------------------

pub const HOME_BADGE: &str = "CPT208 Group 35 Project";
pub const HOME_HEADLINE: &str = "AutismRecover:";
pub const HOME_TAGLINE: &str = "Building Bridges Through Art";
pub const HOME_PITCH: &str = "An AR-based therapeutic system powered by Generative AI. We transform autistic children's drawings into interactive 3D companions, using art as a safe bridge for communication and emotional support.";
pub const CTA_DEMO: &str = "Try the Demo";
pub const CTA_RESEARCH: &str = "Learn the Research";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Primary,
    Accent,
    Secondary,
}

#[derive(Debug, Clone, Copy)]
pub struct ValueProp {
    pub title: &'static str,
    pub body: &'static str,
    pub accent: Accent,
}

pub const VALUE_PROPS: [ValueProp; 3] = [
    ValueProp {
        title: "Emotional Support",
        body: "Reduces anxiety through supportive dialogues and non-verbal interactions like high-fives.",
        accent: Accent::Primary,
    },
    ValueProp {
        title: "Personalized Companions",
        body: "Uses Generative AI to turn children's own sketches into unique, familiar 3D friends.",
        accent: Accent::Accent,
    },
    ValueProp {
        title: "AR-Based Interaction",
        body: "Brings the digital friend into the real world via AR glasses for an immersive experience.",
        accent: Accent::Secondary,
    },
];

pub const TEAM_HEADING: &str = "Created by Group 35";
pub const TEAM: [&str; 5] = ["Tonghui Wu", "Zihan Yu", "Yize Liu", "Liwei Xu", "Haotian Zeng"];

// --- Research --------------------------------------------------------------

pub const RESEARCH_HEADING: &str = "Design Process & Iterations";
pub const RESEARCH_INTRO: &str = "Our user-centered design process involved 4 major iterations, constantly refining based on feedback from children and experts.";

pub const PROBLEM_TITLE: &str = "Problem Statement";
pub const PROBLEM_BODY: &str = "Autistic children often struggle with social interaction and initiating communication. Traditional therapy tools can be rigid, failing to engage their creativity or provide a \"safe\" bridge to the outside world.";
pub const USERS_TITLE: &str = "Target Users";
pub const USERS_BODY: &str = "Children with autism spectrum disorder (ASD) aged 6-12 who show an interest in drawing but experience anxiety in face-to-face social scenarios.";

#[derive(Debug, Clone, Copy)]
pub struct Iteration {
    pub title: &'static str,
    pub summary: &'static str,
    pub insight: &'static str,
    pub accent: Accent,
    pub has_chart: bool,
}

pub const ITERATIONS: [Iteration; 4] = [
    Iteration {
        title: "Iteration 1: From Sketch to 3D",
        summary: "Validated the technical feasibility of the '2D Drawing -> 3D Character' pipeline.",
        insight: "Key Discovery: Children were excited to see their art come to life, but static models lacked engagement.",
        accent: Accent::Primary,
        has_chart: false,
    },
    Iteration {
        title: "Iteration 2: High-Five Interaction",
        summary: "Introduced gesture-based interaction to transform the model into a 'friend'.",
        insight: "Key Change: Added AR gesture recognition. Children preferred physical interaction (high-fives) over passive viewing.",
        accent: Accent::Secondary,
        has_chart: false,
    },
    Iteration {
        title: "Iteration 3: Dialogue UI",
        summary: "Evolved from a confusing left-panel chat to immersive speech bubbles.",
        insight: "Design Shift: Moving text closer to the avatar's face (Bubbles + Bottom Bar) significantly improved speaker attribution.",
        accent: Accent::Primary,
        has_chart: false,
    },
    Iteration {
        title: "Iteration 4: Waiting & Loading",
        summary: "Optimized the empty 'loading' state which caused anxiety.",
        insight: "Result: Adding progress bars and comforting voice prompts ('I'm almost here!') reduced anxiety scores by 35%.",
        accent: Accent::Accent,
        has_chart: true,
    },
];

pub const CHART_TITLE: &str = "USER ANXIETY LEVELS (LOWER IS BETTER)";

/// One bar of the anxiety chart, scored out of 10.
#[derive(Debug, Clone, Copy)]
pub struct ChartBar {
    pub label: &'static str,
    pub value_label: &'static str,
    pub score: f64,
    pub highlighted: bool,
}

impl ChartBar {
    pub fn fraction(&self) -> f64 {
        (self.score / 10.0).clamp(0.0, 1.0)
    }
}

pub const ANXIETY_CHART: [ChartBar; 2] = [
    ChartBar {
        label: "Before Optimization",
        value_label: "High (8.5/10)",
        score: 8.5,
        highlighted: false,
    },
    ChartBar {
        label: "After (With Progress UI)",
        value_label: "Low (3.2/10)",
        score: 3.2,
        highlighted: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_last_iteration_has_chart() {
        let charted: Vec<_> = ITERATIONS.iter().filter(|i| i.has_chart).collect();
        assert_eq!(charted.len(), 1);
        assert!(charted[0].title.starts_with("Iteration 4"));
    }

    #[test]
    fn chart_bars_scale_to_width() {
        assert!((ANXIETY_CHART[0].fraction() - 0.85).abs() < 1e-9);
        assert!((ANXIETY_CHART[1].fraction() - 0.32).abs() < 1e-9);
    }
}
