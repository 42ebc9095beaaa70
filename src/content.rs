use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub answer: Vec<String>,
    #[serde(default, rename = "audioFile")]
    pub audio_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub name: String,
    pub designation: String,
    pub company: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Content {
    pub candidate: Candidate,
    pub share_text: String,
    pub share_url: String,
    pub questions: Vec<Question>,
}

impl Content {
    pub fn title(&self) -> String {
        match self.candidate.name.split_whitespace().next() {
            Some(first_name) => format!("{first_name}'s Cover Letter"),
            None => "My Cover Letter".to_string(),
        }
    }

    pub fn share_message(&self) -> String {
        let url = self.share_url.trim();
        if url.is_empty() {
            format!("{} - {}", self.title(), self.share_text)
        } else {
            format!("{} - {} {url}", self.title(), self.share_text)
        }
    }
}

pub fn load_content(path: Option<&Path>) -> Result<Content> {
    let Some(path) = path else {
        return Ok(Content::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read content file {}", path.display()))?;
    parse_content(&raw).with_context(|| format!("invalid content file {}", path.display()))
}

pub fn parse_content(raw: &str) -> Result<Content> {
    let content: Content = serde_json::from_str(raw).context("content is not valid JSON")?;
    if let Some(idx) = content
        .questions
        .iter()
        .position(|item| item.question.trim().is_empty())
    {
        bail!("question {} has empty text", idx + 1);
    }
    Ok(content)
}

impl Default for Candidate {
    fn default() -> Self {
        Self {
            name: "Akshay Borhade".to_string(),
            designation: "Associate Director Product Design".to_string(),
            company: "OLA".to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            candidate: Candidate::default(),
            share_text: "Check out Akshay's interactive cover letter showcasing technical expertise and experience".to_string(),
            share_url: String::new(),
            questions: default_questions(),
        }
    }
}

fn question(text: &str, answer: &[&str], audio_file: &str) -> Question {
    Question {
        question: text.to_string(),
        answer: answer.iter().map(|line| line.to_string()).collect(),
        audio_file: Some(audio_file.to_string()),
    }
}

fn default_questions() -> Vec<Question> {
    vec![
        question(
            "What Makes Me Right for This Role",
            &[
                "I've been doing this at Ola as Associate Director - balancing the big picture stuff with actually hands on in design",
                "Built products across totally different worlds: ride-sharing, AI chat assistant at Ola, insurance chaos at CoverSure, parenting madness at The ParentInc",
                "I don't just hand off pretty mockups - I build working prototypes that developers can actually use",
                "Led teams while still being the person who catches those tiny interaction details that make users go \"wow\"",
            ],
            "01.mp3",
        ),
        question(
            "Why My Background Fits Noon Perfectly",
            &[
                "E-commerce is basically what I've been doing at Ola - complex user journeys, tons of stakeholders, millions of people using your stuff daily",
                "CoverSure taught me how to make complicated financial stuff feel simple (trust me, if you can make insurance easy, you can make anything easy)",
                "The ParentInc showed me how to design for diverse markets across Southeast Asia - different cultures, different needs, same goal of delighting users",
                "I've always worked on products where user trust isn't optional - it's everything",
            ],
            "06.mp3",
        ),
        question(
            "What I Bring That other Designers Can't",
            &[
                "I can smell a bad user flow from a mile away and know exactly what to fix it",
                "Built systems that actually get people hooked on products (the good kind of hooked)",
                "I've seen enough patterns across industries to steal the best ideas and make them work in new contexts",
            ],
            "11.mp3",
        ),
        question(
            "Working with Anyone, Regardless of Age",
            &[
                "Honestly, the best ideas come from everywhere - I've learned killer insights from fresh graduates",
                "I listen first, ask questions, then figure out where I can actually help",
                "Been doing this long enough to know that ego kills good design",
                "My job is to make everyone around me better, not prove I'm the smartest person in the room",
            ],
            "15.mp3",
        ),
        question(
            "Why Noon, Not Just Any Senior Role",
            &[
                "E-commerce is where design decisions immediately shows up in revenue - I love that direct impact",
                "Noon's complexity keeps me sharp - marketplace dynamics, seller tools, buyer journeys, it's all interconnected",
                "Most senior roles pull you away from actual design work, but this feels like I can still create while leading",
                "I want to build something that million of people actually uses and loves it",
            ],
            "20.mp3",
        ),
        question(
            "Where I See This Going",
            &[
                "First year: Fix the obvious stuff, build trust with teams, start seeing real improvements in user metrics",
                "Next phase: Own big product initiatives, mentor the junior folks, start shaping product strategy",
                "Long term: Be the design voice in major business decisions while growing a team that can ship world-class experiences",
            ],
            "25.mp3",
        ),
        question(
            "How I Mentor Without Dropping the Ball",
            &[
                "I bring designers into real projects - they learn by doing, not by creating assumptions around the product",
                "Show them my actual process while we're building something that matters",
                "They get better, I get fresh perspectives, everyone wins",
                "No separate \"mentoring time\" - we learn together while shipping great work",
            ],
            "29.mp3",
        ),
        question(
            "Staying Hands-On While Pushing Innovation",
            &[
                "Built AI workflows that turn my Figma designs into working code - no more \"it looked different in design\"",
                "Use AI to test designs before we even build them - synthetic user testing saves us weeks",
                "I automate the boring stuff so I can focus on the creative problems",
                "Small teams can ship complex experiences when you use the right tools smartly",
            ],
            "34.mp3",
        ),
        question(
            "How I Got Here",
            &[
                "Started fixing pixels, learned to think about users, grew into someone who can see the whole business picture",
                "Each job taught me something crucial: Ola showed me scale, CoverSure taught me trust, The ParentInc revealed cultural nuance",
                "I don't climb ladders - I solve bigger problems",
                "All that experience helps me see solutions which others misses",
            ],
            "39.mp3",
        ),
    ]
}

const DEFAULT_SUMMARY: &str = "I currently serve as Associate Director at Ola and bring extensive cross-industry experience spanning consumer platforms, fintech at CoverSure, and parenting platforms at The ParentInc. I have successfully led design teams, scaled design systems, and delivered products used by millions of users while maintaining a balance between strategic leadership and hands-on craft execution. My value proposition centers on my systematic problem-solving approach and ability to simplify complex business requirements into intuitive user interfaces. My cross-industry experience has given me pattern recognition skills that allow me to adapt solutions from one domain to another effectively. I am particularly drawn to Noon because of the direct impact that e-commerce design decisions have on business outcomes and the complex, engaging challenges that the marketplace presents. In terms of my leadership philosophy, I emphasize collaborative, egalitarian working relationships over traditional hierarchies. I express comfort with taking direction from potentially younger managers while contributing my senior expertise, believing that mutual respect and shared goals matter more than seniority levels. My mentoring approach involves real-world, hands-on learning rather than separate training sessions, integrating junior designers into actual project work. I have a clear growth vision for my role at Noon, starting with improving platform navigation and building cross-team relationships in the first year, then progressing to lead major product projects and mentor junior designers, ultimately becoming a strategic design leader who influences product direction. I also demonstrate innovation through AI integration, having developed workflows that convert Figma designs to code and create automated design reviews, focusing on AI that enhances rather than replaces human creativity. My career trajectory shows steady growth from individual contributor to strategic leader across multiple industries, with each role teaching me valuable lessons about regulations, scaling for millions of users, and influencing user behavior through design. This breadth of experience has equipped me with the ability to see connections others might miss and solve increasingly complex problems while maintaining excellence in execution.";
