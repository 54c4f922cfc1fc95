//! Navigable pages of the shell

use crate::models::Disease;
use std::fmt;

/// A page the user can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Prediction(Disease),
    Chatbot,
}

impl Page {
    /// Pages in sidebar order
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Prediction(Disease::Diabetes),
        Page::Prediction(Disease::HeartDisease),
        Page::Prediction(Disease::Parkinsons),
        Page::Chatbot,
    ];

    /// Menu entry name
    pub fn menu_name(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Prediction(Disease::Diabetes) => "Diabetes Prediction",
            Page::Prediction(Disease::HeartDisease) => "Heart Disease Prediction",
            Page::Prediction(Disease::Parkinsons) => "Parkinson's Prediction",
            Page::Chatbot => "Chatbot",
        }
    }

    /// Title shown when the page opens
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Welcome to SmartMed",
            Page::Prediction(Disease::Diabetes) => "Diabetes Prediction",
            Page::Prediction(Disease::HeartDisease) => "Heart Disease Prediction",
            Page::Prediction(Disease::Parkinsons) => "Parkinson's Disease Prediction",
            Page::Chatbot => "AI ChatBOT",
        }
    }

    /// Command that opens this page
    pub fn command(&self) -> &'static str {
        match self {
            Page::Home => "/home",
            Page::Prediction(Disease::Diabetes) => "/diabetes",
            Page::Prediction(Disease::HeartDisease) => "/heart",
            Page::Prediction(Disease::Parkinsons) => "/parkinsons",
            Page::Chatbot => "/chat",
        }
    }

    /// Prompt label for free text on this page
    pub fn prompt(&self) -> String {
        match self {
            Page::Home => "smartmed> ".to_string(),
            Page::Prediction(disease) => format!("{}> ", disease.key()),
            Page::Chatbot => "you> ".to_string(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.menu_name())
    }
}

/// Body of the Home page
pub const HOME_TEXT: &str = "\
SmartMed is an AI-powered health prediction system that helps users detect early signs of
diseases like Diabetes, Heart Disease, and Parkinson's Disease. Use the page commands to
navigate between features.

About Me
  - Developer: Vijaya Suhaas Nadukooru
  - Education: B.Tech in Information Technology, VIT Vellore
  - Expertise: AI, Cloud Computing, Full Stack Development
  - Research: Published paper on Steganography

Predictions come from pre-trained classifiers and are not a medical diagnosis.";
