use std::fmt;

use serde::{Deserialize, Serialize};

/// Named collections of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Users,
    HealthMetrics,
    MentalHealthResources,
    MentalHealthAssessments,
    TherapistSessions,
    Appointments,
    FitnessActivities,
    Adolescents,
    GuardianAccessRequests,
    Pages,
    HomePageContent,
    HealthData,
    CartItems,
    Services,
    BookingSlots,
    Bookings,
    ThankYouPageFeedback,
    HealthPrograms,
    BlogPosts,
}

impl Collection {
    /// Collection name as stored in the `records.collection` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "Users",
            Collection::HealthMetrics => "HealthMetrics",
            Collection::MentalHealthResources => "MentalHealthResources",
            Collection::MentalHealthAssessments => "MentalHealthAssessments",
            Collection::TherapistSessions => "TherapistSessions",
            Collection::Appointments => "Appointments",
            Collection::FitnessActivities => "FitnessActivities",
            Collection::Adolescents => "Adolescents",
            Collection::GuardianAccessRequests => "GuardianAccessRequests",
            Collection::Pages => "Pages",
            Collection::HomePageContent => "HomePageContent",
            Collection::HealthData => "HealthData",
            Collection::CartItems => "CartItems",
            Collection::Services => "Services",
            Collection::BookingSlots => "BookingSlots",
            Collection::Bookings => "Bookings",
            Collection::ThankYouPageFeedback => "ThankYouPageFeedback",
            Collection::HealthPrograms => "HealthPrograms",
            Collection::BlogPosts => "BlogPosts",
        }
    }

    /// Field whose value must be unique across the collection, if any.
    ///
    /// Must agree with the partial unique indexes in `migrations/`.
    #[inline]
    pub fn unique_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users => Some("email"),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
